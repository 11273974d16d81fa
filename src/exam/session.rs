use crate::exam::model::{ExamPayload, Question};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Mcq,
    Coding,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Mcq => "mcq",
            Section::Coding => "coding",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Mcq => "MCQ",
            Section::Coding => "Coding",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Section::Mcq => Section::Coding,
            Section::Coding => Section::Mcq,
        }
    }
}

/// One question plus its mutable per-session UI state.
/// `answered` and `marked_for_review` are independent: a question may be both.
#[derive(Clone, Debug)]
pub struct QuestionSlot {
    pub question: Question,
    pub subject: String,
    pub answered: bool,
    pub marked_for_review: bool,
    pub answer: Option<String>,
}

impl QuestionSlot {
    fn new(question: Question, subject: &str) -> Self {
        Self {
            question,
            subject: subject.to_string(),
            answered: false,
            marked_for_review: false,
            answer: None,
        }
    }
}

/// In-memory state for one exam sitting. The exam definition is read-only;
/// only the per-slot answer/flag state mutates. Nothing is persisted until
/// submission, so quitting the client discards progress.
pub struct ExamSession {
    pub exam_id: String,
    pub batch: String,
    mcq: Vec<QuestionSlot>,
    coding: Vec<QuestionSlot>,
}

impl ExamSession {
    /// Flatten the subject-scoped question lists into two linear arrays,
    /// preserving subject declaration order.
    pub fn from_payload(payload: &ExamPayload) -> Self {
        let mut mcq = Vec::new();
        let mut coding = Vec::new();
        for subject in &payload.exam.subjects {
            for q in &subject.mcqs {
                mcq.push(QuestionSlot::new(q.clone(), &subject.subject));
            }
            for q in &subject.coding {
                coding.push(QuestionSlot::new(q.clone(), &subject.subject));
            }
        }
        Self {
            exam_id: payload.exam.exam_id.clone(),
            batch: payload.exam.batch.clone(),
            mcq,
            coding,
        }
    }

    pub fn slots(&self, section: Section) -> &[QuestionSlot] {
        match section {
            Section::Mcq => &self.mcq,
            Section::Coding => &self.coding,
        }
    }

    fn slots_mut(&mut self, section: Section) -> &mut Vec<QuestionSlot> {
        match section {
            Section::Mcq => &mut self.mcq,
            Section::Coding => &mut self.coding,
        }
    }

    pub fn len(&self, section: Section) -> usize {
        self.slots(section).len()
    }

    pub fn is_empty(&self) -> bool {
        self.mcq.is_empty() && self.coding.is_empty()
    }

    pub fn total_questions(&self) -> usize {
        self.mcq.len() + self.coding.len()
    }

    pub fn slot(&self, section: Section, index: usize) -> Option<&QuestionSlot> {
        self.slots(section).get(index)
    }

    /// Record an answer for a question and flag it as answered. The value is
    /// whatever the question type produces: an option key for MCQ, source
    /// text for coding.
    pub fn set_answer(&mut self, section: Section, index: usize, value: String) {
        if let Some(slot) = self.slots_mut(section).get_mut(index) {
            slot.answered = true;
            slot.answer = Some(value);
        }
    }

    /// Retract a recorded answer. Leaves the review flag alone.
    pub fn clear_answer(&mut self, section: Section, index: usize) {
        if let Some(slot) = self.slots_mut(section).get_mut(index) {
            slot.answered = false;
            slot.answer = None;
        }
    }

    pub fn toggle_mark(&mut self, section: Section, index: usize) {
        if let Some(slot) = self.slots_mut(section).get_mut(index) {
            slot.marked_for_review = !slot.marked_for_review;
        }
    }

    pub fn answered_count(&self) -> usize {
        self.mcq
            .iter()
            .chain(self.coding.iter())
            .filter(|s| s.answered)
            .count()
    }

    pub fn marked_count(&self) -> usize {
        self.mcq
            .iter()
            .chain(self.coding.iter())
            .filter(|s| s.marked_for_review)
            .count()
    }
}
