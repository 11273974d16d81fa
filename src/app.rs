use chrono::{DateTime, Utc};

use crate::api::{self, SubmissionPayload, SubmitError};
use crate::config::Config;
use crate::exam::navigator::Navigator;
use crate::exam::session::{ExamSession, Section};
use crate::exam::timer::{Deadline, TimeRemaining, TimerError};
use crate::ui::answer_input::AnswerInput;
use crate::ui::components::question_view::OPTION_KEYS;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Exam,
    ConfirmSubmit,
    Submitted,
}

pub struct App {
    pub screen: AppScreen,
    pub session: ExamSession,
    pub navigator: Navigator,
    pub theme: &'static Theme,
    pub config: Config,
    pub student_id: String,
    pub submit_url: String,
    /// None when no deadline could be derived from the payload; the
    /// countdown then renders "--:--:--" and the exam stays usable.
    pub deadline: Option<Deadline>,
    pub time_left: Option<TimeRemaining>,
    /// Latched once the deadline passes; recomputation stops here.
    pub expired: bool,
    /// Live coding-answer editor; Some only while editing.
    pub editor: Option<AnswerInput>,
    /// Transient user-facing message shown in the footer.
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        mut session: ExamSession,
        deadline: Result<Deadline, TimerError>,
        theme: &'static Theme,
        config: Config,
        student_id: String,
    ) -> Self {
        let submit_url = format!(
            "{}/student/submit-exam",
            config.server_url.trim_end_matches('/')
        );
        // The payload's batch wins; the configured one only fills a gap
        if session.batch.is_empty() {
            session.batch = config.batch.clone();
        }
        let (deadline, notice) = match deadline {
            Ok(d) => (Some(d), None),
            // Timer failure is fatal to the timer only, not to the exam
            Err(e) => (None, Some(format!("countdown unavailable: {e}"))),
        };
        Self {
            screen: AppScreen::Exam,
            session,
            navigator: Navigator::new(),
            theme,
            config,
            student_id,
            submit_url,
            deadline,
            time_left: deadline.map(|d| d.remaining(Utc::now())),
            expired: false,
            editor: None,
            notice,
            should_quit: false,
        }
    }

    /// Recompute the countdown. Once the deadline has passed the value is
    /// latched at zero and further ticks are no-ops.
    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if self.expired {
            return;
        }
        self.time_left = Some(deadline.remaining(now));
        if deadline.is_expired(now) {
            self.expired = true;
            self.notice = Some("time is up — review and submit your answers".to_string());
        }
    }

    pub fn current_section(&self) -> Section {
        self.navigator.section
    }

    pub fn next_question(&mut self) {
        self.navigator.next(&self.session);
    }

    pub fn prev_question(&mut self) {
        self.navigator.prev(&self.session);
    }

    pub fn switch_section(&mut self) {
        // Don't leave a half-edited coding answer behind
        self.close_editor();
        self.navigator.switch_section(&self.session);
    }

    pub fn select_question(&mut self, index: usize) {
        self.navigator.select(self.navigator.section, index, &self.session);
    }

    /// Record an MCQ answer from its option key ('a', 'b', ...). Keys that
    /// don't correspond to an option of the current question are ignored.
    pub fn answer_option(&mut self, key: char) {
        let section = self.navigator.section;
        if section != Section::Mcq {
            return;
        }
        let index = self.navigator.current();
        let Some(slot) = self.session.slot(section, index) else {
            return;
        };
        let Some(pos) = OPTION_KEYS.iter().position(|&k| k == key) else {
            return;
        };
        if pos < slot.question.options.len() {
            self.session.set_answer(section, index, key.to_string());
        }
    }

    pub fn clear_current_answer(&mut self) {
        let section = self.navigator.section;
        self.session.clear_answer(section, self.navigator.current());
    }

    pub fn toggle_current_mark(&mut self) {
        let section = self.navigator.section;
        self.session.toggle_mark(section, self.navigator.current());
    }

    /// Open the coding editor seeded with any previously recorded answer.
    pub fn open_editor(&mut self) {
        if self.navigator.section != Section::Coding {
            return;
        }
        let index = self.navigator.current();
        let seed = self
            .session
            .slot(Section::Coding, index)
            .and_then(|s| s.answer.as_deref())
            .unwrap_or("");
        self.editor = Some(AnswerInput::new(seed));
    }

    /// Commit the editor buffer back into the session. An emptied buffer
    /// retracts the answer rather than recording an empty submission.
    pub fn close_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        let index = self.navigator.current();
        if editor.is_empty() {
            self.session.clear_answer(Section::Coding, index);
        } else {
            self.session
                .set_answer(Section::Coding, index, editor.value().to_string());
        }
    }

    pub fn request_submit(&mut self) {
        self.close_editor();
        self.screen = AppScreen::ConfirmSubmit;
    }

    pub fn cancel_submit(&mut self) {
        self.screen = AppScreen::Exam;
    }

    /// Serialize all answer state and POST it. All-or-nothing: a failure
    /// keeps every answer intact and the student may retry manually.
    pub fn confirm_submit(&mut self) {
        let now = Utc::now();
        let payload = SubmissionPayload::from_session(&self.session, &self.student_id, now);
        let result = api::submit_exam(&self.submit_url, &payload);
        self.handle_submit_result(result);
    }

    pub fn handle_submit_result(&mut self, result: Result<(), SubmitError>) {
        match result {
            Ok(()) => {
                self.notice = None;
                self.screen = AppScreen::Submitted;
            }
            Err(e) => {
                self.notice = Some(format!("submission failed: {e} — answers kept, retry with [s]"));
                self.screen = AppScreen::Exam;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::model::{ExamInfo, ExamPayload, Question, SubjectBlock};
    use chrono::TimeZone;

    fn question(id: &str, options: usize) -> Question {
        Question {
            id: id.to_string(),
            prompt: id.to_string(),
            options: (0..options).map(|i| format!("opt {i}")).collect(),
            constraints: None,
            score: 1,
            difficulty: None,
            tags: Vec::new(),
        }
    }

    fn make_app() -> App {
        let payload = ExamPayload {
            exam: ExamInfo {
                exam_id: "EX-1".to_string(),
                batch: "PFS-100".to_string(),
                starts_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()),
                start_time: None,
                total_exam_time: 30,
                subjects: vec![SubjectBlock {
                    subject: "Rust".to_string(),
                    mcqs: vec![question("m1", 2), question("m2", 4)],
                    coding: vec![question("c1", 0)],
                    time_constraints: None,
                }],
            },
        };
        let session = ExamSession::from_payload(&payload);
        let deadline = Deadline::from_exam(&payload.exam, Utc::now());
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        App::new(
            session,
            deadline,
            theme,
            Config::default(),
            "stu-42".to_string(),
        )
    }

    #[test]
    fn test_answer_option_records_key() {
        let mut app = make_app();
        app.answer_option('b');
        let slot = app.session.slot(Section::Mcq, 0).unwrap();
        assert!(slot.answered);
        assert_eq!(slot.answer.as_deref(), Some("b"));
    }

    #[test]
    fn test_answer_option_out_of_range_key_ignored() {
        let mut app = make_app();
        // m1 has two options, so 'c' maps past the end
        app.answer_option('c');
        assert!(!app.session.slot(Section::Mcq, 0).unwrap().answered);
    }

    #[test]
    fn test_editor_roundtrip_records_coding_answer() {
        let mut app = make_app();
        app.switch_section();
        assert_eq!(app.current_section(), Section::Coding);
        app.open_editor();
        for ch in "fn main() {}".chars() {
            app.editor
                .as_mut()
                .unwrap()
                .handle(crossterm::event::KeyEvent::new(
                    crossterm::event::KeyCode::Char(ch),
                    crossterm::event::KeyModifiers::NONE,
                ));
        }
        app.close_editor();
        let slot = app.session.slot(Section::Coding, 0).unwrap();
        assert_eq!(slot.answer.as_deref(), Some("fn main() {}"));
        assert!(slot.answered);
    }

    #[test]
    fn test_emptied_editor_retracts_answer() {
        let mut app = make_app();
        app.switch_section();
        app.session.set_answer(Section::Coding, 0, "x".to_string());
        app.open_editor();
        app.editor
            .as_mut()
            .unwrap()
            .handle(crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Backspace,
                crossterm::event::KeyModifiers::NONE,
            ));
        app.close_editor();
        assert!(!app.session.slot(Section::Coding, 0).unwrap().answered);
    }

    #[test]
    fn test_failed_submission_keeps_state_and_screen() {
        let mut app = make_app();
        app.answer_option('a');
        app.toggle_current_mark();
        app.request_submit();
        assert_eq!(app.screen, AppScreen::ConfirmSubmit);

        app.handle_submit_result(Err(SubmitError::Status(503)));

        assert_eq!(app.screen, AppScreen::Exam);
        let slot = app.session.slot(Section::Mcq, 0).unwrap();
        assert!(slot.answered);
        assert!(slot.marked_for_review);
        assert_eq!(slot.answer.as_deref(), Some("a"));
        assert!(app.notice.as_deref().unwrap().contains("submission failed"));
    }

    #[test]
    fn test_successful_submission_reaches_terminal_screen() {
        let mut app = make_app();
        app.handle_submit_result(Ok(()));
        assert_eq!(app.screen, AppScreen::Submitted);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_tick_latches_at_deadline() {
        let mut app = make_app();
        let before = Utc.with_ymd_and_hms(2026, 3, 2, 10, 29, 59).unwrap();
        app.on_tick(before);
        assert!(!app.expired);
        assert_eq!(app.time_left.unwrap().total_seconds(), 1);

        let after = Utc.with_ymd_and_hms(2026, 3, 2, 10, 31, 0).unwrap();
        app.on_tick(after);
        assert!(app.expired);
        assert!(app.time_left.unwrap().is_zero());

        // Latched: further ticks change nothing
        let later = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
        app.on_tick(later);
        assert!(app.time_left.unwrap().is_zero());
    }

    #[test]
    fn test_config_batch_fills_missing_payload_batch() {
        let payload = ExamPayload {
            exam: ExamInfo {
                exam_id: "EX-3".to_string(),
                batch: String::new(),
                starts_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()),
                start_time: None,
                total_exam_time: 30,
                subjects: vec![SubjectBlock {
                    subject: "A".to_string(),
                    mcqs: vec![question("m1", 2)],
                    coding: Vec::new(),
                    time_constraints: None,
                }],
            },
        };
        let session = ExamSession::from_payload(&payload);
        let deadline = Deadline::from_exam(&payload.exam, Utc::now());
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let mut config = Config::default();
        config.batch = "PFS-200".to_string();
        let app = App::new(session, deadline, theme, config, "stu-42".to_string());
        assert_eq!(app.session.batch, "PFS-200");
    }

    #[test]
    fn test_payload_batch_wins_over_config_batch() {
        let payload = ExamPayload {
            exam: ExamInfo {
                exam_id: "EX-4".to_string(),
                batch: "PFS-100".to_string(),
                starts_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()),
                start_time: None,
                total_exam_time: 30,
                subjects: vec![SubjectBlock {
                    subject: "A".to_string(),
                    mcqs: vec![question("m1", 2)],
                    coding: Vec::new(),
                    time_constraints: None,
                }],
            },
        };
        let session = ExamSession::from_payload(&payload);
        let deadline = Deadline::from_exam(&payload.exam, Utc::now());
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let mut config = Config::default();
        config.batch = "PFS-999".to_string();
        let app = App::new(session, deadline, theme, config, "stu-42".to_string());
        assert_eq!(app.session.batch, "PFS-100");

        let submission = SubmissionPayload::from_session(&app.session, "stu-42", Utc::now());
        assert_eq!(submission.batch, "PFS-100");
    }

    #[test]
    fn test_timer_failure_leaves_exam_usable() {
        let payload = ExamPayload {
            exam: ExamInfo {
                exam_id: "EX-2".to_string(),
                batch: String::new(),
                starts_at: None,
                start_time: Some("not-a-time".to_string()),
                total_exam_time: 30,
                subjects: vec![SubjectBlock {
                    subject: "A".to_string(),
                    mcqs: vec![question("m1", 2)],
                    coding: Vec::new(),
                    time_constraints: None,
                }],
            },
        };
        let session = ExamSession::from_payload(&payload);
        let deadline = Deadline::from_exam(&payload.exam, Utc::now());
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let mut app = App::new(session, deadline, theme, Config::default(), String::new());

        assert!(app.deadline.is_none());
        assert!(app.time_left.is_none());
        assert!(app.notice.as_deref().unwrap().contains("countdown unavailable"));

        // Navigation and answering still work
        app.answer_option('a');
        assert!(app.session.slot(Section::Mcq, 0).unwrap().answered);
        app.on_tick(Utc::now());
        assert!(app.time_left.is_none());
    }
}
