use serde::{Deserialize, Serialize};

/// Top-level shape of the exam payload returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamPayload {
    pub exam: ExamInfo,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamInfo {
    #[serde(default, alias = "examId")]
    pub exam_id: String,
    #[serde(default)]
    pub batch: String,
    /// Full RFC3339 start instant. Preferred over `start_time`: it survives
    /// exams that span midnight or are viewed on a later day.
    #[serde(default, alias = "startsAt")]
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Legacy bare time-of-day ("HH:MM", 24-hour, assumed today).
    #[serde(default, alias = "startTime")]
    pub start_time: Option<String>,
    #[serde(default, alias = "totalExamTime")]
    pub total_exam_time: i64,
    #[serde(default)]
    pub subjects: Vec<SubjectBlock>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectBlock {
    #[serde(default)]
    pub subject: String,
    #[serde(default, alias = "MCQs")]
    pub mcqs: Vec<Question>,
    #[serde(default, alias = "Coding")]
    pub coding: Vec<Question>,
    #[serde(default, alias = "timeConstraints")]
    pub time_constraints: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(alias = "text", alias = "question")]
    pub prompt: String,
    /// MCQ choices. Empty for coding questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Coding constraints/problem notes. None for MCQs.
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_backend_field_casing() {
        let json = r#"{
            "exam": {
                "examId": "EX-9",
                "batch": "PFS-100",
                "startTime": "10:00",
                "totalExamTime": 30,
                "subjects": [
                    {
                        "subject": "Rust",
                        "MCQs": [
                            {"id": "q1", "text": "What is ownership?", "options": ["a", "b"], "score": 2}
                        ],
                        "Coding": [
                            {"id": "c1", "question": "Reverse a list", "constraints": "O(n)", "score": 10}
                        ],
                        "timeConstraints": "none"
                    }
                ]
            }
        }"#;
        let payload: ExamPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.exam.exam_id, "EX-9");
        assert_eq!(payload.exam.start_time.as_deref(), Some("10:00"));
        assert!(payload.exam.starts_at.is_none());
        assert_eq!(payload.exam.total_exam_time, 30);
        let subject = &payload.exam.subjects[0];
        assert_eq!(subject.mcqs[0].prompt, "What is ownership?");
        assert_eq!(subject.coding[0].constraints.as_deref(), Some("O(n)"));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let json = r#"{"exam": {"examId": "EX-1", "totalExamTime": 10, "subjects": [{"subject": "DS"}]}}"#;
        let payload: ExamPayload = serde_json::from_str(json).unwrap();
        let subject = &payload.exam.subjects[0];
        assert!(subject.mcqs.is_empty());
        assert!(subject.coding.is_empty());
    }

    #[test]
    fn test_rfc3339_start_instant() {
        let json = r#"{"exam": {"examId": "EX-2", "startsAt": "2026-03-01T10:00:00Z", "totalExamTime": 60, "subjects": []}}"#;
        let payload: ExamPayload = serde_json::from_str(json).unwrap();
        let starts_at = payload.exam.starts_at.unwrap();
        assert_eq!(starts_at.to_rfc3339(), "2026-03-01T10:00:00+00:00");
    }
}
