//! A single background typing run.
//!
//! [`TypingSession`] owns the text snapshot, the `typing` flag and the OS
//! thread that types.  The flag is `true` while the session is live; anyone
//! may clear it to cancel, and the thread always clears it on the way out,
//! whether the run completed, was cancelled, failed or panicked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use rand::rngs::StdRng;

use crate::inject::KeyboardBackend;

use super::engine::{type_text, DelayProfile};
use super::state::StatusLine;
use super::TypingError;

/// Handle to a running (or finished) typing thread.
pub struct TypingSession {
    typing: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Clears the flag when the typing thread exits by any path.
struct ClearOnExit {
    typing: Arc<AtomicBool>,
    status: StatusLine,
}

impl Drop for ClearOnExit {
    fn drop(&mut self) {
        self.typing.store(false, Ordering::Release);
        if std::thread::panicking() {
            log::error!("typing thread panicked");
            self.status.set("Error during typing: session aborted");
        }
    }
}

impl TypingSession {
    /// Spawn the `typing-session` thread for `text`.
    ///
    /// `profile` is the delay snapshot taken by the caller; it is not re-read.
    ///
    /// # Errors
    ///
    /// [`TypingError::ClipboardEmpty`] for empty `text`, or
    /// [`TypingError::Spawn`] if the OS refuses to create the thread.
    pub fn start(
        text: String,
        profile: DelayProfile,
        keyboard: Arc<dyn KeyboardBackend>,
        status: StatusLine,
        mut rng: StdRng,
    ) -> Result<Self, TypingError> {
        if text.is_empty() {
            return Err(TypingError::ClipboardEmpty);
        }

        let typing = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&typing);

        let handle = std::thread::Builder::new()
            .name("typing-session".into())
            .spawn(move || {
                let _guard = ClearOnExit {
                    typing: Arc::clone(&flag),
                    status: status.clone(),
                };

                if !profile.start.is_zero() {
                    log::info!(
                        "typing {} chars after {:?} start delay",
                        text.chars().count(),
                        profile.start
                    );
                    status.set(format!("Starting in {}s...", profile.start.as_secs_f64()));
                    std::thread::sleep(profile.start);
                }
                if flag.load(Ordering::Acquire) {
                    status.set("Typing in progress...");
                }

                let result = keyboard
                    .open()
                    .map_err(TypingError::Backend)
                    .and_then(|mut keys| {
                        type_text(&text, &profile, &flag, keys.as_mut(), &mut rng)
                    });

                match result {
                    Ok(outcome) => {
                        log::info!("typing session ended: {outcome:?}");
                        status.set(outcome.label());
                    }
                    Err(e) => {
                        log::error!("error during typing: {e}");
                        status.set(format!("Error during typing: {e}"));
                    }
                }
            })
            .map_err(TypingError::Spawn)?;

        Ok(Self { typing, handle })
    }

    /// `true` until the session is cancelled or its thread exits.
    pub fn is_active(&self) -> bool {
        self.typing.load(Ordering::Acquire)
    }

    /// Ask the thread to stop before its next character.  Returns whether
    /// the session was still active.
    pub fn cancel(&self) -> bool {
        self.typing.swap(false, Ordering::AcqRel)
    }

    /// `true` once the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the thread exits.
    pub fn join(self) {
        if self.handle.join().is_err() {
            log::warn!("typing thread ended with a panic");
        }
    }
}
