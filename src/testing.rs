//! In-memory stand-ins for the input hook, keyboard and clipboard.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use crate::config::Settings;
use crate::controller::ToggleController;
use crate::hotkey::{HotkeyEvent, InputHook, RawKeyEvent, RegistrationError};
use crate::inject::{ClipboardSource, InjectError, KeyboardBackend, Keystroker};

/// Records bindings; `press` feeds the current raw subscription.
#[derive(Default)]
pub struct FakeHook {
    bindings: Mutex<Vec<(String, HotkeyEvent)>>,
    raw: Mutex<Option<mpsc::Sender<RawKeyEvent>>>,
    /// Hotkey string that `bind` refuses.
    reject: Option<String>,
}

impl FakeHook {
    pub fn rejecting(hotkey: &str) -> Self {
        Self {
            reject: Some(hotkey.into()),
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> Vec<(String, HotkeyEvent)> {
        self.bindings.lock().unwrap().clone()
    }

    pub fn press(&self, events: &[RawKeyEvent]) {
        let raw = self.raw.lock().unwrap();
        let tx = raw.as_ref().expect("raw subscription");
        for event in events {
            tx.send(event.clone()).unwrap();
        }
    }
}

impl InputHook for FakeHook {
    fn bind(&self, hotkey: &str, action: HotkeyEvent) -> Result<(), RegistrationError> {
        if self.reject.as_deref() == Some(hotkey) {
            return Err(RegistrationError::UnknownKey(hotkey.into()));
        }
        *self.raw.lock().unwrap() = None;
        self.bindings
            .lock()
            .unwrap()
            .push((hotkey.to_string(), action));
        Ok(())
    }

    fn unbind_all(&self) {
        self.bindings.lock().unwrap().clear();
        *self.raw.lock().unwrap() = None;
    }

    fn subscribe_raw(&self) -> mpsc::Receiver<RawKeyEvent> {
        let (tx, rx) = mpsc::channel();
        self.bindings.lock().unwrap().clear();
        *self.raw.lock().unwrap() = Some(tx);
        rx
    }
}

/// Appends every typed character to `typed`.
#[derive(Default)]
pub struct FakeKeyboard {
    pub typed: Arc<Mutex<String>>,
}

struct FakeKeys(Arc<Mutex<String>>);

impl Keystroker for FakeKeys {
    fn type_char(&mut self, ch: char) -> Result<(), InjectError> {
        self.0.lock().unwrap().push(ch);
        Ok(())
    }
}

impl KeyboardBackend for FakeKeyboard {
    fn open(&self) -> Result<Box<dyn Keystroker>, InjectError> {
        Ok(Box::new(FakeKeys(Arc::clone(&self.typed))))
    }
}

pub struct FakeClipboard(pub Mutex<Option<String>>);

impl FakeClipboard {
    pub fn set(&self, text: Option<&str>) {
        *self.0.lock().unwrap() = text.map(str::to_string);
    }
}

impl ClipboardSource for FakeClipboard {
    fn read_text(&self) -> Result<Option<String>, InjectError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// A controller wired to fakes, saving into a temporary directory.
pub struct Harness {
    pub controller: Arc<ToggleController>,
    pub hook: Arc<FakeHook>,
    pub typed: Arc<Mutex<String>>,
    pub clipboard: Arc<FakeClipboard>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new(settings: Settings) -> Self {
        Self::with_hook(settings, FakeHook::default())
    }

    pub fn with_hook(settings: Settings, hook: FakeHook) -> Self {
        Self::build(settings, hook, Duration::from_millis(100))
    }

    /// For tests that act while a recording is still open.
    pub fn slow_recording(settings: Settings) -> Self {
        Self::build(settings, FakeHook::default(), Duration::from_secs(5))
    }

    fn build(settings: Settings, hook: FakeHook, record_timeout: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let hook = Arc::new(hook);
        let keyboard = Arc::new(FakeKeyboard::default());
        let typed = Arc::clone(&keyboard.typed);
        let clipboard = Arc::new(FakeClipboard(Mutex::new(Some("hello".into()))));
        let controller = ToggleController::new(
            settings,
            dir.path().join("settings.json"),
            hook.clone(),
            keyboard,
            clipboard.clone(),
        )
        .with_record_timeout(record_timeout);
        Self {
            controller: Arc::new(controller),
            hook,
            typed,
            clipboard,
            dir,
        }
    }

    pub fn typed(&self) -> String {
        self.typed.lock().unwrap().clone()
    }

    pub fn saved(&self) -> Settings {
        Settings::load_from(&self.dir.path().join("settings.json")).unwrap()
    }
}

/// Settings with every delay at zero.
pub fn instant_settings() -> Settings {
    Settings {
        min_delay: 0.0,
        max_delay: 0.0,
        start_delay: 0.0,
        ..Settings::default()
    }
}
