//! Status line and session outcomes.
//!
//! [`StatusLine`] is the single user-visible message.  Every operation that
//! can fail converts its error into a status string here; the UI reads it on
//! each repaint.  It is cheap to clone and safe to share across threads.

use std::sync::{Arc, Mutex};

/// Shared, thread-safe status message.
#[derive(Debug, Clone)]
pub struct StatusLine(Arc<Mutex<String>>);

impl StatusLine {
    pub fn new(initial: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(initial.into())))
    }

    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("status: {message}");
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = message;
    }

    pub fn get(&self) -> String {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new("Ready")
    }
}

/// How a typing run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingOutcome {
    /// Every character was emitted.
    Completed { typed: usize },
    /// The cancellation flag was observed after `typed` characters.
    Cancelled { typed: usize },
}

impl TypingOutcome {
    pub fn typed(&self) -> usize {
        match self {
            TypingOutcome::Completed { typed } | TypingOutcome::Cancelled { typed } => *typed,
        }
    }

    /// Status message for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            TypingOutcome::Completed { .. } => "Typing completed",
            TypingOutcome::Cancelled { .. } => "Typing stopped",
        }
    }
}
