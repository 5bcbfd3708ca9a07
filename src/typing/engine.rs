//! The typing loop.
//!
//! ```text
//! sleep(start_delay)
//! for ch in text:
//!     if !typing: stop            (partial output is kept)
//!     emit(ch)
//!     sleep(uniform(min_delay, max_delay))
//! ```
//!
//! Cancellation is cooperative: the flag is checked once per character, so a
//! stop takes effect within one inter-character delay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;

use crate::config::Settings;
use crate::inject::Keystroker;

use super::state::TypingOutcome;
use super::TypingError;

/// Delays captured from the settings when a session starts.  Later settings
/// edits do not affect a running session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayProfile {
    pub min: Duration,
    pub max: Duration,
    pub start: Duration,
}

impl DelayProfile {
    pub const ZERO: DelayProfile = DelayProfile {
        min: Duration::ZERO,
        max: Duration::ZERO,
        start: Duration::ZERO,
    };

    /// Snapshot the delays of `settings`.  Invalid values collapse to zero and
    /// out-of-order bounds are swapped.
    pub fn from_settings(settings: &Settings) -> Self {
        let secs = |v: f64| Duration::try_from_secs_f64(v).unwrap_or_default();
        let (a, b) = (secs(settings.min_delay), secs(settings.max_delay));
        Self {
            min: a.min(b),
            max: a.max(b),
            start: secs(settings.start_delay),
        }
    }

    /// Draw an inter-character delay uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Type `text` through `keys`, honouring `typing` as the cancellation flag.
///
/// The start delay is not slept here; see [`super::TypingSession`].
///
/// # Errors
///
/// [`TypingError::Keystroke`] on the first character that cannot be emitted;
/// `position` equals the number of characters already typed.
pub fn type_text<K, R>(
    text: &str,
    profile: &DelayProfile,
    typing: &AtomicBool,
    keys: &mut K,
    rng: &mut R,
) -> Result<TypingOutcome, TypingError>
where
    K: Keystroker + ?Sized,
    R: Rng + ?Sized,
{
    let mut typed = 0;
    for ch in text.chars() {
        if !typing.load(Ordering::Acquire) {
            log::info!("typing cancelled after {typed} characters");
            return Ok(TypingOutcome::Cancelled { typed });
        }

        keys.type_char(ch).map_err(|source| TypingError::Keystroke {
            position: typed,
            ch,
            source,
        })?;
        typed += 1;

        let delay = profile.sample(rng);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
    Ok(TypingOutcome::Completed { typed })
}
