//! Application state definitions

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use super::focus::FocusRing;
use super::forms::FormValues;
use crate::demos::DemoKind;

/// How many submissions the history keeps
const SUBMISSION_HISTORY: usize = 10;

/// A submission the demo handler accepted
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub demo: DemoKind,
    pub values: FormValues,
    pub received_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(demo: DemoKind, values: FormValues) -> Self {
        Self {
            demo,
            values,
            received_at: Utc::now(),
        }
    }

    /// Pretty JSON of the submitted values
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.values).unwrap_or_else(|_| "{}".to_string())
    }
}

/// State of the terminal front end around the form engine
#[derive(Debug, Default)]
pub struct AppState {
    /// Demo currently mounted
    pub current_demo: DemoKind,
    /// Keyboard focus on the visible step
    pub focus: FocusRing,
    /// Caller-owned loading flag while a submission is in flight
    pub loading: bool,
    /// One-line message shown in the status bar
    pub status_message: Option<String>,
    /// Queue of errors shown one at a time in a dialog
    pub errors: VecDeque<String>,
    /// Most recent accepted submissions, newest first
    pub submissions: VecDeque<SubmissionRecord>,
    /// Whether the dialog for the latest submission is open
    pub show_submission: bool,
}

impl AppState {
    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.errors.push_back(message);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn record_submission(&mut self, record: SubmissionRecord) {
        self.status_message = Some(format!(
            "{} submitted at {}",
            record.demo.title(),
            record.received_at.format("%H:%M:%S")
        ));
        self.submissions.push_front(record);
        self.submissions.truncate(SUBMISSION_HISTORY);
        self.show_submission = true;
    }

    pub fn latest_submission(&self) -> Option<&SubmissionRecord> {
        self.submissions.front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;

    fn record() -> SubmissionRecord {
        let mut values = FormValues::new();
        values.insert("name".to_string(), FieldValue::from("Ada"));
        values.insert("newsletter".to_string(), FieldValue::Bool(true));
        SubmissionRecord::new(DemoKind::SignUp, values)
    }

    #[test]
    fn test_error_queue_is_fifo() {
        let mut state = AppState::default();
        state.push_error("first".to_string());
        state.push_error("second".to_string());
        assert_eq!(state.current_error(), Some("first"));
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert!(state.current_error().is_none());
    }

    #[test]
    fn test_record_submission_opens_dialog() {
        let mut state = AppState::default();
        state.record_submission(record());
        assert!(state.show_submission);
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Sign Up submitted at"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = AppState::default();
        for _ in 0..(SUBMISSION_HISTORY + 5) {
            state.record_submission(record());
        }
        assert_eq!(state.submissions.len(), SUBMISSION_HISTORY);
    }

    #[test]
    fn test_record_json() {
        let json = record().to_json();
        assert!(json.contains(r#""name": "Ada""#));
        assert!(json.contains(r#""newsletter": true"#));
    }
}
