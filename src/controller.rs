//! Toggle controller — the single source of truth for typing and recording.
//!
//! [`ToggleController`] owns the settings, the status line, the current
//! [`TypingSession`] and the recording guard.  It is shared as
//! `Arc<ToggleController>` between the UI thread and the hotkey dispatcher,
//! and every method is safe to call from either.
//!
//! # Flow
//!
//! ```text
//! HotkeyEvent::Toggle ──▶ toggle()
//!     idle   → read clipboard → TypingSession::start
//!     typing → stop()
//! HotkeyEvent::Stop   ──▶ stop()   (no-op when idle)
//!
//! record_hotkey / record_stop_key
//!     unbind_all → subscribe_raw → thread "hotkey-recorder"
//!         run_recording → unbind_all → register_hotkeys (old values)
//! ```
//!
//! Recorded values are only handed to the callback; they reach the settings
//! when the user saves.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use crate::config::{ConfigError, Settings, SettingsUpdate, Theme, DEFAULT_HOTKEY};
use crate::hotkey::recorder::run_recording;
use crate::hotkey::{
    Chord, HotkeyEvent, InputHook, RecordError, RecordMode, RecorderUpdate, RegistrationError,
    RECORD_TIMEOUT,
};
use crate::inject::{ClipboardSource, KeyboardBackend};
use crate::typing::{DelayProfile, StatusLine, TypingError, TypingSession};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mediates between global hotkeys, the UI and the typing engine.
pub struct ToggleController {
    settings: Mutex<Settings>,
    settings_path: PathBuf,
    status: StatusLine,
    session: Mutex<Option<TypingSession>>,
    recording: AtomicBool,
    /// Serialises every change to what the hook is attached to.
    registration: Mutex<()>,
    record_timeout: Duration,
    hook: Arc<dyn InputHook>,
    keyboard: Arc<dyn KeyboardBackend>,
    clipboard: Arc<dyn ClipboardSource>,
}

impl ToggleController {
    /// Create a controller.  No hotkeys are bound until
    /// [`register_hotkeys`](Self::register_hotkeys) is called.
    pub fn new(
        settings: Settings,
        settings_path: impl Into<PathBuf>,
        hook: Arc<dyn InputHook>,
        keyboard: Arc<dyn KeyboardBackend>,
        clipboard: Arc<dyn ClipboardSource>,
    ) -> Self {
        Self {
            settings: Mutex::new(settings),
            settings_path: settings_path.into(),
            status: StatusLine::default(),
            session: Mutex::new(None),
            recording: AtomicBool::new(false),
            registration: Mutex::new(()),
            record_timeout: RECORD_TIMEOUT,
            hook,
            keyboard,
            clipboard,
        }
    }

    /// Override the 5 s recording timeout.
    pub fn with_record_timeout(mut self, timeout: Duration) -> Self {
        self.record_timeout = timeout;
        self
    }

    // ── Settings ─────────────────────────────────────────────────────────

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        lock(&self.settings).clone()
    }

    /// Validate and apply `update`, re-register both hotkeys and write the
    /// settings file.
    ///
    /// Registration failures are reported on the status line but do not
    /// prevent the save.  A running session keeps the delays it started with.
    /// Refused with [`ConfigError::Recording`] while a key is being recorded.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<(), ConfigError> {
        let registration = lock(&self.registration);
        if self.is_recording() {
            let e = ConfigError::Recording;
            log::warn!("settings update refused: {e}");
            self.status.set(format!("Error: {e}"));
            return Err(e);
        }

        let updated = {
            let mut settings = lock(&self.settings);
            if let Err(e) = settings.apply(update) {
                log::warn!("settings update rejected: {e}");
                self.status.set(format!("Error: {e}"));
                return Err(e);
            }
            settings.clone()
        };
        log::info!("settings updated: {updated:?}");

        let registered = self.register_locked();
        drop(registration);
        let saved = self.settings().save_to(&self.settings_path);

        match (registered, saved) {
            (_, Err(e)) => {
                log::error!("error saving settings: {e}");
                self.status.set(format!("Error saving settings: {e}"));
                return Err(e);
            }
            (Ok(()), Ok(())) => {
                let settings = self.settings();
                self.status.set(format!(
                    "Settings saved. Hotkey '{}' registered{}",
                    settings.hotkey,
                    printable_stop_note(&settings.stop_key)
                ));
            }
            // Registration error stays on the status line.
            (Err(_), Ok(())) => {}
        }
        Ok(())
    }

    /// Switch the theme in memory; it is persisted with the next save.
    pub fn apply_theme(&self, theme: Theme) {
        lock(&self.settings).theme = theme;
    }

    /// Write the current settings without changing anything.
    pub fn save_settings(&self) -> Result<(), ConfigError> {
        self.settings().save_to(&self.settings_path).inspect_err(|e| {
            log::error!("error saving settings: {e}");
            self.status.set(format!("Error saving settings: {e}"));
        })
    }

    // ── Hotkeys ──────────────────────────────────────────────────────────

    /// Detach everything, then bind the configured hotkey to
    /// [`HotkeyEvent::Toggle`] and the stop key to [`HotkeyEvent::Stop`].
    ///
    /// Both bindings are attempted; the first failure is returned and shown
    /// on the status line.
    pub fn register_hotkeys(&self) -> Result<(), RegistrationError> {
        let _registration = lock(&self.registration);
        self.register_locked()
    }

    /// [`register_hotkeys`](Self::register_hotkeys) body; the caller holds
    /// `registration`.
    fn register_locked(&self) -> Result<(), RegistrationError> {
        self.hook.unbind_all();

        let (hotkey, stop_key) = {
            let mut settings = lock(&self.settings);
            if settings.hotkey.is_empty() || !settings.hotkey.contains('+') {
                log::warn!(
                    "invalid hotkey format '{}', defaulting to {DEFAULT_HOTKEY}",
                    settings.hotkey
                );
                settings.hotkey = DEFAULT_HOTKEY.into();
            }
            (settings.hotkey.clone(), settings.stop_key.clone())
        };

        let mut first_error = None;

        match self.hook.bind(&hotkey, HotkeyEvent::Toggle) {
            Ok(()) => {
                log::info!("registered hotkey '{hotkey}'");
                self.status.set(format!(
                    "Hotkey '{hotkey}' registered{}",
                    printable_stop_note(&stop_key)
                ));
            }
            Err(e) => {
                log::error!("error registering hotkey '{hotkey}': {e}");
                self.status.set(format!("Error registering hotkey: {e}"));
                first_error = Some(e);
            }
        }

        match self.hook.bind(&stop_key, HotkeyEvent::Stop) {
            Ok(()) => log::info!("registered stop key '{stop_key}'"),
            Err(e) => {
                log::error!("error registering stop key '{stop_key}': {e}");
                self.status.set(format!("Error registering stop key: {e}"));
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    // ── Typing ───────────────────────────────────────────────────────────

    /// Start typing when idle, stop when typing.
    pub fn toggle(&self) -> Result<(), TypingError> {
        log::debug!("toggle called, typing = {}", self.is_typing());
        if self.is_typing() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Cancel the running session.  Idempotent.
    pub fn stop(&self) {
        let session = lock(&self.session);
        if let Some(session) = session.as_ref() {
            if session.cancel() {
                log::info!("typing stopped");
                self.status.set("Typing stopped");
            }
        }
    }

    pub fn is_typing(&self) -> bool {
        lock(&self.session)
            .as_ref()
            .is_some_and(TypingSession::is_active)
    }

    fn start(&self) -> Result<(), TypingError> {
        if self.is_recording() {
            log::warn!("typing refused while recording a key");
            self.status.set(format!("Error: {}", TypingError::Recording));
            return Err(TypingError::Recording);
        }

        let mut session = lock(&self.session);

        if let Some(current) = session.as_ref() {
            if current.is_active() {
                return Ok(());
            }
            if !current.is_finished() {
                log::warn!("previous typing thread still running");
                self.status.set(format!("Error: {}", TypingError::Busy));
                return Err(TypingError::Busy);
            }
        }

        let text = match self.clipboard.read_text() {
            Ok(Some(text)) if !text.is_empty() => text.replace("\r\n", "\n"),
            Ok(_) => {
                log::warn!("clipboard is empty, nothing to type");
                self.status.set(format!("Error: {}", TypingError::ClipboardEmpty));
                return Err(TypingError::ClipboardEmpty);
            }
            Err(e) => {
                log::error!("cannot read clipboard: {e}");
                let e = TypingError::Clipboard(e);
                self.status.set(format!("Error: {e}"));
                return Err(e);
            }
        };

        let profile = DelayProfile::from_settings(&lock(&self.settings));
        log::info!(
            "starting typing session: {} chars, {profile:?}",
            text.chars().count()
        );
        self.status.set("Typing in progress...");

        match TypingSession::start(
            text,
            profile,
            Arc::clone(&self.keyboard),
            self.status.clone(),
            StdRng::from_entropy(),
        ) {
            Ok(started) => {
                *session = Some(started);
                Ok(())
            }
            Err(e) => {
                log::error!("cannot start typing: {e}");
                self.status.set(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    // ── Recording ────────────────────────────────────────────────────────

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    /// Record a new start/stop hotkey.  `on_update` receives candidates while
    /// keys are pressed and [`RecorderUpdate::Finished`] once the previous
    /// bindings are restored.
    pub fn record_hotkey<F>(self: &Arc<Self>, on_update: F) -> Result<(), RecordError>
    where
        F: Fn(RecorderUpdate) + Send + 'static,
    {
        self.record(RecordMode::Combo, on_update)
    }

    /// Record a new emergency stop key.  Same contract as
    /// [`record_hotkey`](Self::record_hotkey).
    pub fn record_stop_key<F>(self: &Arc<Self>, on_update: F) -> Result<(), RecordError>
    where
        F: Fn(RecorderUpdate) + Send + 'static,
    {
        self.record(RecordMode::Single, on_update)
    }

    fn record<F>(self: &Arc<Self>, mode: RecordMode, on_update: F) -> Result<(), RecordError>
    where
        F: Fn(RecorderUpdate) + Send + 'static,
    {
        let events = {
            let _registration = lock(&self.registration);
            if self.recording.swap(true, Ordering::AcqRel) {
                return Err(RecordError::AlreadyRecording);
            }
            log::info!("recording {mode:?} key");
            self.hook.unbind_all();
            self.hook.subscribe_raw()
        };

        let controller = Arc::clone(self);
        let timeout = self.record_timeout;
        let spawned = std::thread::Builder::new()
            .name("hotkey-recorder".into())
            .spawn(move || {
                let value = run_recording(mode, &events, timeout, &on_update);
                drop(events);
                controller.finish_recording(mode, &value);
                on_update(RecorderUpdate::Finished(value));
            });

        if let Err(e) = spawned {
            log::error!("cannot start recorder thread: {e}");
            self.finish_recording(mode, "");
            return Err(RecordError::Spawn(e));
        }
        Ok(())
    }

    fn finish_recording(&self, mode: RecordMode, value: &str) {
        log::info!("recorded {mode:?} key: '{value}'");
        // Restore the committed bindings; the recorded value waits for Save.
        let _registration = lock(&self.registration);
        let _ = self.register_locked();
        self.recording.store(false, Ordering::Release);
    }

    // ── Status / lifecycle ───────────────────────────────────────────────

    pub fn status(&self) -> String {
        self.status.get()
    }

    pub fn status_line(&self) -> StatusLine {
        self.status.clone()
    }

    /// Stop typing, detach all hooks and save the settings.
    pub fn shutdown(&self) {
        log::info!("shutting down controller");
        self.stop();
        {
            let _registration = lock(&self.registration);
            self.hook.unbind_all();
        }
        let _ = self.save_settings();
    }
}

/// Status suffix for a stop key that is an unmodified printable character,
/// which fires whenever typed text contains it.
fn printable_stop_note(stop_key: &str) -> String {
    match Chord::parse(stop_key) {
        Ok(chord) if chord.is_plain_printable() => {
            log::warn!("stop key '{stop_key}' is a plain character; typing it will stop typing");
            format!(" (stop key '{stop_key}' is printable)")
        }
        _ => String::new(),
    }
}

/// Route hotkey events to the controller until the channel closes.
///
/// Each event is handled on the blocking pool because starting a session
/// reads the clipboard.
pub async fn run_hotkey_dispatch(
    controller: Arc<ToggleController>,
    mut hotkey_rx: mpsc::Receiver<HotkeyEvent>,
) {
    while let Some(event) = hotkey_rx.recv().await {
        log::debug!("hotkey event: {event:?}");
        let controller = Arc::clone(&controller);
        let handled = tokio::task::spawn_blocking(move || match event {
            HotkeyEvent::Toggle => {
                let _ = controller.toggle();
            }
            HotkeyEvent::Stop => controller.stop(),
        })
        .await;
        if let Err(e) = handled {
            log::error!("hotkey handler failed: {e}");
        }
    }

    log::info!("hotkey channel closed, dispatcher shutting down");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
impl ToggleController {
    /// Block until the current session's thread has exited.
    pub(crate) fn wait_idle(&self) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            let done = lock(&self.session)
                .as_ref()
                .map_or(true, TypingSession::is_finished);
            if done {
                return;
            }
            assert!(
                std::time::Instant::now() < deadline,
                "typing session did not finish"
            );
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
