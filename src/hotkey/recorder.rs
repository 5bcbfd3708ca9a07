//! Hotkey recording.
//!
//! While recording, the global bindings are detached and raw key events are
//! fed to a short-lived state machine instead:
//!
//! ```text
//! combo:  Recording ──key-up of a non-modifier──▶ Finalized
//!         Recording ──5 s without finalising────▶ Finalized (whatever is held)
//! single: Recording ──first key-down────────────▶ Finalized
//!         Recording ──5 s───────────────────────▶ Finalized ("esc")
//! ```
//!
//! Once finalised a recorder ignores every further event and timeout, so a
//! late key-up can never overwrite a value produced by the timeout.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use super::keys::{is_modifier, modifier_rank, normalize_name};
use super::RawKeyEvent;

/// How long a recording waits before finalising on its own.
pub const RECORD_TIMEOUT: Duration = Duration::from_secs(5);

/// Modifier inserted when a combo was recorded without one.
pub const FALLBACK_MODIFIER: &str = "ctrl";
/// Trigger key inserted when a combo was recorded without one.
pub const FALLBACK_KEY: &str = "t";
/// Stop key used when single-key recording times out.
pub const FALLBACK_STOP_KEY: &str = "esc";

/// Which value is being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Start/stop hotkey: modifiers plus one key.
    Combo,
    /// Emergency stop key: one key, taken verbatim.
    Single,
}

impl RecordMode {
    /// Text shown in the key field while waiting for input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            RecordMode::Combo => "Press keys...",
            RecordMode::Single => "Press key...",
        }
    }
}

/// Progress reported to whoever started a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderUpdate {
    /// The value to display right now (placeholder or partial combo).
    Candidate(String),
    /// Recording is over and the global bindings are back in place.
    Finished(String),
}

// ---------------------------------------------------------------------------
// ComboRecorder
// ---------------------------------------------------------------------------

/// State machine for the start/stop hotkey.
#[derive(Debug, Default)]
pub struct ComboRecorder {
    /// Every key pressed so far, in first-press order, without duplicates.
    pressed: Vec<String>,
    finalized: Option<String>,
}

impl ComboRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key-down.  Returns the candidate string to display, or
    /// `None` once finalised.
    pub fn key_down(&mut self, raw: &str) -> Option<String> {
        if self.finalized.is_some() {
            return None;
        }
        let name = normalize_name(raw);
        if !self.pressed.contains(&name) {
            self.pressed.push(name);
        }
        Some(self.candidate())
    }

    /// Register a key-up.  Releasing a non-modifier finalises the recording
    /// and returns the final hotkey.
    pub fn key_up(&mut self, raw: &str) -> Option<String> {
        if self.finalized.is_some() || is_modifier(&normalize_name(raw)) {
            return None;
        }
        Some(self.finalize())
    }

    /// Force-finalise with whatever is held.  `None` if already finalised.
    pub fn timeout(&mut self) -> Option<String> {
        if self.finalized.is_some() {
            return None;
        }
        Some(self.finalize())
    }

    /// Modifiers in canonical order followed by the first non-modifier.
    pub fn candidate(&self) -> String {
        let (modifiers, key) = self.split();
        modifiers.into_iter().chain(key).collect::<Vec<_>>().join("+")
    }

    pub fn result(&self) -> Option<&str> {
        self.finalized.as_deref()
    }

    fn finalize(&mut self) -> String {
        let (mut modifiers, key) = self.split();
        if modifiers.is_empty() {
            modifiers.push(FALLBACK_MODIFIER);
        }
        let key = key.unwrap_or(FALLBACK_KEY);
        let hotkey = modifiers
            .into_iter()
            .chain(Some(key))
            .collect::<Vec<_>>()
            .join("+");
        self.finalized = Some(hotkey.clone());
        hotkey
    }

    fn split(&self) -> (Vec<&str>, Option<&str>) {
        let mut modifiers: Vec<&str> = self
            .pressed
            .iter()
            .map(String::as_str)
            .filter(|name| is_modifier(name))
            .collect();
        modifiers.sort_by_key(|name| modifier_rank(name));
        let key = self
            .pressed
            .iter()
            .map(String::as_str)
            .find(|name| !is_modifier(name));
        (modifiers, key)
    }
}

// ---------------------------------------------------------------------------
// SingleRecorder
// ---------------------------------------------------------------------------

/// State machine for the emergency stop key.
#[derive(Debug, Default)]
pub struct SingleRecorder {
    finalized: Option<String>,
}

impl SingleRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first key-down finalises with that key's name.
    pub fn key_down(&mut self, raw: &str) -> Option<String> {
        if self.finalized.is_some() {
            return None;
        }
        let name = normalize_name(raw);
        self.finalized = Some(name.clone());
        Some(name)
    }

    pub fn timeout(&mut self) -> Option<String> {
        if self.finalized.is_some() {
            return None;
        }
        self.finalized = Some(FALLBACK_STOP_KEY.to_string());
        self.finalized.clone()
    }

    pub fn result(&self) -> Option<&str> {
        self.finalized.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Recording loop
// ---------------------------------------------------------------------------

enum Recorder {
    Combo(ComboRecorder),
    Single(SingleRecorder),
}

/// Feed raw events from `events` into a fresh recorder until it finalises or
/// `timeout` elapses, reporting candidates through `on_update`.
///
/// Blocks the calling thread; run it on a dedicated one.  A disconnected
/// channel is treated like a timeout.
pub fn run_recording(
    mode: RecordMode,
    events: &Receiver<RawKeyEvent>,
    timeout: Duration,
    on_update: &dyn Fn(RecorderUpdate),
) -> String {
    let deadline = Instant::now() + timeout;
    let mut recorder = match mode {
        RecordMode::Combo => Recorder::Combo(ComboRecorder::new()),
        RecordMode::Single => Recorder::Single(SingleRecorder::new()),
    };
    on_update(RecorderUpdate::Candidate(mode.placeholder().to_string()));

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let event = match events.recv_timeout(remaining) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                log::info!("hotkey recording timed out");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("raw key stream closed during recording");
                break;
            }
        };

        match (&mut recorder, event) {
            (Recorder::Combo(rec), RawKeyEvent::Down(name)) => {
                if let Some(candidate) = rec.key_down(&name) {
                    on_update(RecorderUpdate::Candidate(candidate));
                }
            }
            (Recorder::Combo(rec), RawKeyEvent::Up(name)) => {
                if let Some(hotkey) = rec.key_up(&name) {
                    return hotkey;
                }
            }
            (Recorder::Single(rec), RawKeyEvent::Down(name)) => {
                if let Some(key) = rec.key_down(&name) {
                    return key;
                }
            }
            (Recorder::Single(_), RawKeyEvent::Up(_)) => {}
        }
    }

    let forced = match &mut recorder {
        Recorder::Combo(rec) => rec.timeout(),
        Recorder::Single(rec) => rec.timeout(),
    };
    forced.unwrap_or_else(|| match mode {
        RecordMode::Combo => format!("{FALLBACK_MODIFIER}+{FALLBACK_KEY}"),
        RecordMode::Single => FALLBACK_STOP_KEY.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;

    #[test]
    fn combo_ctrl_shift_t() {
        let mut rec = ComboRecorder::new();
        assert_eq!(rec.key_down("ctrl").as_deref(), Some("ctrl"));
        assert_eq!(rec.key_down("shift").as_deref(), Some("ctrl+shift"));
        assert_eq!(rec.key_down("t").as_deref(), Some("ctrl+shift+t"));
        assert_eq!(rec.key_up("t").as_deref(), Some("ctrl+shift+t"));
        assert_eq!(rec.result(), Some("ctrl+shift+t"));
    }

    #[test]
    fn combo_sorts_modifiers_and_folds_aliases() {
        let mut rec = ComboRecorder::new();
        rec.key_down("windows");
        rec.key_down("shift");
        rec.key_down("control");
        rec.key_down("k");
        assert_eq!(rec.candidate(), "ctrl+shift+win+k");
    }

    #[test]
    fn combo_without_modifier_defaults_to_ctrl() {
        let mut rec = ComboRecorder::new();
        rec.key_down("a");
        assert_eq!(rec.key_up("a").as_deref(), Some("ctrl+a"));
    }

    #[test]
    fn combo_keeps_first_non_modifier() {
        let mut rec = ComboRecorder::new();
        rec.key_down("alt");
        rec.key_down("x");
        rec.key_down("y");
        assert_eq!(rec.candidate(), "alt+x");
        assert_eq!(rec.key_up("y").as_deref(), Some("alt+x"));
    }

    #[test]
    fn modifier_release_does_not_finalize() {
        let mut rec = ComboRecorder::new();
        rec.key_down("ctrl");
        assert_eq!(rec.key_up("ctrl"), None);
        assert_eq!(rec.result(), None);
    }

    #[test]
    fn combo_timeout_with_nothing_pressed() {
        let mut rec = ComboRecorder::new();
        assert_eq!(rec.timeout().as_deref(), Some("ctrl+t"));
    }

    #[test]
    fn combo_timeout_with_only_modifiers_defaults_key() {
        let mut rec = ComboRecorder::new();
        rec.key_down("alt");
        assert_eq!(rec.timeout().as_deref(), Some("alt+t"));
    }

    #[test]
    fn timeout_suppresses_later_key_events() {
        let mut rec = ComboRecorder::new();
        rec.key_down("ctrl");
        assert_eq!(rec.timeout().as_deref(), Some("ctrl+t"));
        assert_eq!(rec.key_down("q"), None);
        assert_eq!(rec.key_up("q"), None);
        assert_eq!(rec.timeout(), None);
        assert_eq!(rec.result(), Some("ctrl+t"));
    }

    #[test]
    fn single_takes_first_key_verbatim() {
        let mut rec = SingleRecorder::new();
        assert_eq!(rec.key_down("a").as_deref(), Some("a"));
        assert_eq!(rec.key_down("b"), None);
        assert_eq!(rec.timeout(), None);
        assert_eq!(rec.result(), Some("a"));
    }

    #[test]
    fn single_normalizes_name() {
        let mut rec = SingleRecorder::new();
        assert_eq!(rec.key_down("Escape").as_deref(), Some("esc"));
    }

    #[test]
    fn single_timeout_defaults_to_esc() {
        let mut rec = SingleRecorder::new();
        assert_eq!(rec.timeout().as_deref(), Some("esc"));
        assert_eq!(rec.key_down("q"), None);
    }

    #[test]
    fn run_combo_from_channel() {
        let (tx, rx) = mpsc::channel();
        for event in [
            RawKeyEvent::Down("ctrl".into()),
            RawKeyEvent::Down("shift".into()),
            RawKeyEvent::Down("t".into()),
            RawKeyEvent::Up("t".into()),
            RawKeyEvent::Down("z".into()),
        ] {
            tx.send(event).unwrap();
        }

        let updates = Mutex::new(Vec::new());
        let hotkey = run_recording(RecordMode::Combo, &rx, Duration::from_secs(5), &|u: RecorderUpdate| {
            updates.lock().unwrap().push(u)
        });

        assert_eq!(hotkey, "ctrl+shift+t");
        assert_eq!(
            updates.into_inner().unwrap(),
            vec![
                RecorderUpdate::Candidate("Press keys...".into()),
                RecorderUpdate::Candidate("ctrl".into()),
                RecorderUpdate::Candidate("ctrl+shift".into()),
                RecorderUpdate::Candidate("ctrl+shift+t".into()),
            ]
        );
    }

    #[test]
    fn run_combo_times_out_to_fallback() {
        let (_tx, rx) = mpsc::channel::<RawKeyEvent>();
        let started = Instant::now();
        let hotkey = run_recording(RecordMode::Combo, &rx, Duration::from_millis(50), &|_: RecorderUpdate| {});
        assert_eq!(hotkey, "ctrl+t");
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn run_single_times_out_to_esc() {
        let (_tx, rx) = mpsc::channel::<RawKeyEvent>();
        let key = run_recording(RecordMode::Single, &rx, Duration::from_millis(20), &|_: RecorderUpdate| {});
        assert_eq!(key, "esc");
    }

    #[test]
    fn run_single_ignores_key_up() {
        let (tx, rx) = mpsc::channel();
        tx.send(RawKeyEvent::Up("ctrl".into())).unwrap();
        tx.send(RawKeyEvent::Down("f8".into())).unwrap();
        let key = run_recording(RecordMode::Single, &rx, Duration::from_secs(5), &|_: RecorderUpdate| {});
        assert_eq!(key, "f8");
    }

    #[test]
    fn disconnected_stream_finalizes_with_held_keys() {
        let (tx, rx) = mpsc::channel();
        tx.send(RawKeyEvent::Down("alt".into())).unwrap();
        tx.send(RawKeyEvent::Down("p".into())).unwrap();
        drop(tx);
        let hotkey = run_recording(RecordMode::Combo, &rx, Duration::from_secs(5), &|_: RecorderUpdate| {});
        assert_eq!(hotkey, "alt+p");
    }
}
