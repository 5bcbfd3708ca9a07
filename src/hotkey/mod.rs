//! Global hotkeys and hotkey recording, backed by `rdev`.
//!
//! # Design
//!
//! The rest of the crate talks to the platform input hook through the
//! [`InputHook`] trait, which offers exactly three things:
//!
//! * bind a hotkey string to a [`HotkeyEvent`],
//! * drop every binding and raw subscription ([`InputHook::unbind_all`]),
//! * subscribe to raw key-down / key-up events for recording.
//!
//! Bindings and raw subscriptions are mutually exclusive: subscribing
//! replaces all bindings, and binding ends any raw subscription.
//!
//! [`RdevHook`] is the production implementation.  `rdev::listen()` is a
//! blocking OS-level call that never returns, so it lives on a dedicated OS
//! thread for the lifetime of the process and routes each event according to
//! the hook's current mode.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use clipboard_typer::hotkey::{HotkeyEvent, InputHook, RdevHook};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let hook = RdevHook::start(tx);
//! hook.bind("ctrl+shift+t", HotkeyEvent::Toggle).expect("bind");
//!
//! // In your async loop:
//! // while let Some(ev) = rx.recv().await { ... }
//! ```

pub mod chord;
pub mod keys;
pub mod listener;
pub mod recorder;

pub use chord::{Chord, Modifiers};
pub use listener::RdevHook;
pub use recorder::{RecordMode, RecorderUpdate, RECORD_TIMEOUT};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Actions fired by global bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The start/stop hotkey was pressed.
    Toggle,
    /// The emergency stop key was pressed.
    Stop,
}

/// A raw key transition, with the key already converted to its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKeyEvent {
    Down(String),
    Up(String),
}

// ---------------------------------------------------------------------------
// RegistrationError
// ---------------------------------------------------------------------------

/// A hotkey string could not be bound.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("hotkey is empty")]
    Empty,

    #[error("malformed hotkey '{0}'")]
    Malformed(String),

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("input hook unavailable: {0}")]
    Backend(String),
}

/// A recording could not be started.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("a key recording is already in progress")]
    AlreadyRecording,

    #[error("cannot start recorder thread: {0}")]
    Spawn(#[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// InputHook
// ---------------------------------------------------------------------------

/// The system input-hook capability.
///
/// Implementations must be callable from any thread.
pub trait InputHook: Send + Sync {
    /// Bind `hotkey` so that pressing it emits `action`.  Ends any raw
    /// subscription.
    fn bind(&self, hotkey: &str, action: HotkeyEvent) -> Result<(), RegistrationError>;

    /// Remove every binding and raw subscription.
    fn unbind_all(&self);

    /// Route every key-down / key-up to the returned receiver until the next
    /// [`bind`](Self::bind) or [`unbind_all`](Self::unbind_all).  Replaces all
    /// bindings.
    fn subscribe_raw(&self) -> std::sync::mpsc::Receiver<RawKeyEvent>;
}
