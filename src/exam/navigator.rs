use crate::exam::session::{ExamSession, Section};

/// Render state of one palette cell. Priority order, first match wins:
/// current cursor, then marked for review, then answered, then unanswered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Current,
    Marked,
    Answered,
    Unanswered,
}

/// Tracks the active section and one cursor per section. Exactly one
/// question is current at a time within a section; cursors are clamped to
/// the section bounds with no wraparound.
pub struct Navigator {
    pub section: Section,
    mcq_cursor: usize,
    coding_cursor: usize,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            section: Section::Mcq,
            mcq_cursor: 0,
            coding_cursor: 0,
        }
    }

    pub fn cursor(&self, section: Section) -> usize {
        match section {
            Section::Mcq => self.mcq_cursor,
            Section::Coding => self.coding_cursor,
        }
    }

    pub fn current(&self) -> usize {
        self.cursor(self.section)
    }

    /// Jump straight to a question in the given section. Indices come from
    /// enumerating the known-length slot array, but clamp anyway so a stale
    /// index can never point past the end.
    pub fn select(&mut self, section: Section, index: usize, session: &ExamSession) {
        let len = session.len(section);
        let clamped = if len == 0 { 0 } else { index.min(len - 1) };
        self.section = section;
        match section {
            Section::Mcq => self.mcq_cursor = clamped,
            Section::Coding => self.coding_cursor = clamped,
        }
    }

    /// Advance within the active section; no-op at the last question.
    pub fn next(&mut self, session: &ExamSession) {
        let len = session.len(self.section);
        let cursor = self.current();
        if cursor + 1 < len {
            self.select(self.section, cursor + 1, session);
        }
    }

    /// Step back within the active section; no-op at question 0.
    pub fn prev(&mut self, session: &ExamSession) {
        let cursor = self.current();
        if cursor > 0 {
            self.select(self.section, cursor - 1, session);
        }
    }

    /// Switch sections, keeping each section's cursor where it was.
    pub fn switch_section(&mut self, session: &ExamSession) {
        let target = self.section.other();
        self.select(target, self.cursor(target), session);
    }

    pub fn slot_status(&self, session: &ExamSession, section: Section, index: usize) -> SlotStatus {
        if section == self.section && index == self.current() {
            return SlotStatus::Current;
        }
        match session.slot(section, index) {
            Some(slot) if slot.marked_for_review => SlotStatus::Marked,
            Some(slot) if slot.answered => SlotStatus::Answered,
            _ => SlotStatus::Unanswered,
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::model::{ExamInfo, ExamPayload, Question, SubjectBlock};

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: id.to_string(),
            options: vec!["a".to_string()],
            constraints: None,
            score: 1,
            difficulty: None,
            tags: Vec::new(),
        }
    }

    fn session(mcq: usize, coding: usize) -> ExamSession {
        let payload = ExamPayload {
            exam: ExamInfo {
                exam_id: "EX-1".to_string(),
                batch: String::new(),
                starts_at: None,
                start_time: None,
                total_exam_time: 3,
                subjects: vec![SubjectBlock {
                    subject: "A".to_string(),
                    mcqs: (0..mcq).map(|i| question(&format!("m{i}"))).collect(),
                    coding: (0..coding).map(|i| question(&format!("c{i}"))).collect(),
                    time_constraints: None,
                }],
            },
        };
        ExamSession::from_payload(&payload)
    }

    #[test]
    fn test_next_stops_at_last_index() {
        let session = session(2, 0);
        let mut nav = Navigator::new();
        nav.next(&session);
        assert_eq!(nav.current(), 1);
        nav.next(&session);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn test_prev_stops_at_zero() {
        let session = session(2, 0);
        let mut nav = Navigator::new();
        nav.prev(&session);
        assert_eq!(nav.current(), 0);
        nav.next(&session);
        nav.prev(&session);
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn test_select_clamps_to_bounds() {
        let session = session(3, 1);
        let mut nav = Navigator::new();
        nav.select(Section::Mcq, 99, &session);
        assert_eq!(nav.current(), 2);
        nav.select(Section::Coding, 5, &session);
        assert_eq!(nav.section, Section::Coding);
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn test_section_cursors_are_independent() {
        let session = session(3, 2);
        let mut nav = Navigator::new();
        nav.next(&session);
        nav.next(&session);
        nav.switch_section(&session);
        assert_eq!(nav.section, Section::Coding);
        assert_eq!(nav.current(), 0);
        nav.switch_section(&session);
        assert_eq!(nav.section, Section::Mcq);
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn test_status_priority_current_beats_marked_and_answered() {
        let mut session = session(1, 0);
        session.set_answer(Section::Mcq, 0, "a".to_string());
        session.toggle_mark(Section::Mcq, 0);
        let nav = Navigator::new();
        assert_eq!(
            nav.slot_status(&session, Section::Mcq, 0),
            SlotStatus::Current
        );
    }

    #[test]
    fn test_status_marked_beats_answered() {
        let mut session = session(2, 0);
        session.set_answer(Section::Mcq, 1, "a".to_string());
        session.toggle_mark(Section::Mcq, 1);
        let nav = Navigator::new();
        assert_eq!(
            nav.slot_status(&session, Section::Mcq, 1),
            SlotStatus::Marked
        );
    }

    #[test]
    fn test_status_grid_for_answered_marked_unanswered() {
        // 2 MCQs + 1 coding. Answer q0, mark q1, leave the coding question
        // untouched; move the cursor off-grid into the coding section so the
        // MCQ statuses are not shadowed by Current.
        let mut session = session(2, 1);
        session.set_answer(Section::Mcq, 0, "a".to_string());
        session.toggle_mark(Section::Mcq, 1);

        let mut nav = Navigator::new();
        nav.select(Section::Coding, 0, &session);

        assert_eq!(
            nav.slot_status(&session, Section::Mcq, 0),
            SlotStatus::Answered
        );
        assert_eq!(
            nav.slot_status(&session, Section::Mcq, 1),
            SlotStatus::Marked
        );
        assert_eq!(
            nav.slot_status(&session, Section::Coding, 0),
            SlotStatus::Current
        );
    }

    #[test]
    fn test_empty_section_status_is_unanswered() {
        let session = session(1, 0);
        let nav = Navigator::new();
        assert_eq!(
            nav.slot_status(&session, Section::Coding, 0),
            SlotStatus::Unanswered
        );
    }
}
