//! Keystroke synthesis and clipboard access.
//!
//! # Overview
//!
//! The typing engine never talks to the OS directly.  It goes through two
//! seams:
//!
//! * [`KeyboardBackend`] opens a [`Keystroker`] on the thread that will use
//!   it (enigo handles are not `Send`, so one is created per typing session).
//! * [`ClipboardSource`] reads the current clipboard text.
//!
//! [`EnigoBackend`] and [`SystemClipboard`] are the production
//! implementations.

pub mod clipboard;
pub mod keyboard;

pub use clipboard::SystemClipboard;
pub use keyboard::{EnigoBackend, EnigoKeystroker};

use thiserror::Error;

// ---------------------------------------------------------------------------
// InjectError
// ---------------------------------------------------------------------------

/// All errors that can surface while reading the clipboard or emitting keys.
#[derive(Debug, Error)]
pub enum InjectError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// The keystroke backend could not be initialised.
    #[error("cannot initialise keyboard: {0}")]
    Backend(String),

    /// Could not simulate a key press/release event.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),

    /// The character has no keystroke on this platform.
    #[error("unsupported character {0:?}")]
    UnsupportedChar(char),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Emits one synthetic keystroke per character.
pub trait Keystroker {
    fn type_char(&mut self, ch: char) -> Result<(), InjectError>;
}

/// Creates [`Keystroker`]s.  Shared across threads; the keystroker itself
/// stays on the thread that opened it.
pub trait KeyboardBackend: Send + Sync {
    fn open(&self) -> Result<Box<dyn Keystroker>, InjectError>;
}

/// Read access to the system clipboard.
pub trait ClipboardSource: Send + Sync {
    /// Current clipboard text, or `None` when the clipboard is empty or holds
    /// non-text data.
    fn read_text(&self) -> Result<Option<String>, InjectError>;
}
