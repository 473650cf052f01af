use dependency_versions_check::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ProgressReporter that records every message it is given
///
/// Errors are prefixed with `Error: ` and completions with `Completed: `;
/// progress updates are dropped.
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.get_messages().iter().any(|m| m.contains(fragment))
    }

    fn record(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.record(message.to_string());
    }

    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}

    fn report_error(&self, message: &str) {
        self.record(format!("Error: {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.record(format!("Completed: {}", message));
    }
}
