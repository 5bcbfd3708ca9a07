//! Typing simulation.
//!
//! # Architecture
//!
//! ```text
//! ToggleController::toggle()
//!   └─▶ TypingSession::start(text, DelayProfile, backend)   [typing = true]
//!         └─▶ thread "typing-session"
//!               ├─ sleep(start_delay)
//!               ├─ engine::type_text()  ── checks `typing` before each char
//!               └─ ClearOnExit                              [typing = false]
//! ```
//!
//! The UI polls [`TypingSession::is_active`] (through the controller) and the
//! shared [`StatusLine`]; nothing is pushed to it.

pub mod engine;
pub mod session;
pub mod state;

pub use engine::{type_text, DelayProfile};
pub use session::TypingSession;
pub use state::{StatusLine, TypingOutcome};

use thiserror::Error;

use crate::inject::InjectError;

/// Why a typing session could not start or ended early.
#[derive(Debug, Error)]
pub enum TypingError {
    /// Nothing to type.
    #[error("Clipboard is empty")]
    ClipboardEmpty,

    /// The clipboard could not be read.
    #[error("{0}")]
    Clipboard(InjectError),

    /// The keystroke backend could not be opened.
    #[error("{0}")]
    Backend(InjectError),

    /// Emitting the character at `position` failed.
    #[error("failed to type {ch:?} at position {position}: {source}")]
    Keystroke {
        position: usize,
        ch: char,
        #[source]
        source: InjectError,
    },

    /// The previous session's thread has not exited yet.
    #[error("Still stopping previous session")]
    Busy,

    /// A hotkey is being recorded; the stop key is not bound.
    #[error("Finish recording the key before typing")]
    Recording,

    /// The typing thread could not be created.
    #[error("cannot start typing thread: {0}")]
    Spawn(#[source] std::io::Error),
}
