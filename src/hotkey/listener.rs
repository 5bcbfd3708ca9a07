//! Dedicated OS-thread input hook using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread and
//! can only be started once per process.  [`RdevHook`] owns that thread and a
//! mode switch; the callback looks at the mode on every event to decide
//! whether to match bindings, forward raw events, or drop everything.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Dropping the hook sets a
//! stop flag so the callback silently ignores further events, but the OS
//! thread itself stays blocked in the rdev event loop until the process
//! exits.
//!
//! # Known limitation: no suppression
//!
//! `rdev::listen` only observes input.  A matched hotkey or stop key is
//! still delivered to the focused window, so a printable stop key types
//! its character before typing halts.  Swallowing keys would need
//! `rdev::grab` behind rdev's `unstable_grab` feature, which requires
//! accessibility permission on macOS and device access on Linux.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc as std_mpsc, Arc, Mutex, MutexGuard,
};

use tokio::sync::mpsc;

use super::chord::{Chord, Modifiers};
use super::keys::key_name;
use super::{HotkeyEvent, InputHook, RawKeyEvent, RegistrationError};

/// Where key events currently go.
enum HookMode {
    /// Nothing is bound.
    Detached,
    /// Match against bindings and emit their actions.
    Bound(Vec<(Chord, HotkeyEvent)>),
    /// Forward every transition to a recorder.
    Raw(std_mpsc::Sender<RawKeyEvent>),
}

struct HookShared {
    mode: Mutex<HookMode>,
    /// Modifiers currently held, tracked in every mode.
    held: Mutex<Modifiers>,
    stop: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// RdevHook
// ---------------------------------------------------------------------------

/// Handle to the process-wide `rdev` listener thread.
///
/// Construct one with [`RdevHook::start`] and share it behind an `Arc`.
pub struct RdevHook {
    shared: Arc<HookShared>,
    /// Kept so the thread is not detached prematurely; never joined because
    /// `rdev::listen` never returns.
    _thread: Option<std::thread::JoinHandle<()>>,
}

impl RdevHook {
    /// Spawn the listener thread.  Binding actions are delivered on `tx`
    /// with `try_send`; the hook thread never waits on a full channel.
    ///
    /// If the thread cannot be created the hook is still returned but never
    /// fires; the failure is logged.
    pub fn start(tx: mpsc::Sender<HotkeyEvent>) -> Self {
        let shared = Arc::new(HookShared {
            mode: Mutex::new(HookMode::Detached),
            held: Mutex::new(Modifiers::NONE),
            stop: AtomicBool::new(false),
        });
        let callback_shared = Arc::clone(&shared);

        let thread = std::thread::Builder::new()
            .name("input-hook".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if callback_shared.stop.load(Ordering::Relaxed) {
                        return;
                    }
                    handle_event(&callback_shared, &tx, event.event_type);
                });

                if let Err(e) = result {
                    log::error!("input-hook: rdev::listen exited with error: {:?}", e);
                }
            });

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("failed to spawn input-hook thread: {e}");
                None
            }
        };

        Self {
            shared,
            _thread: thread,
        }
    }
}

fn handle_event(
    shared: &HookShared,
    tx: &mpsc::Sender<HotkeyEvent>,
    event_type: rdev::EventType,
) {
    let (name, pressed) = match event_type {
        rdev::EventType::KeyPress(key) => (key_name(key), true),
        rdev::EventType::KeyRelease(key) => (key_name(key), false),
        _ => return,
    };
    let Some(name) = name else { return };

    // Snapshot of the modifiers held *before* this event.
    let held = {
        let mut held = lock(&shared.held);
        let before = *held;
        if pressed {
            held.insert(name);
        } else {
            held.remove(name);
        }
        before
    };

    let fired: Vec<HotkeyEvent> = {
        let mut mode = lock(&shared.mode);
        match &mut *mode {
            HookMode::Bound(bindings) if pressed => bindings
                .iter()
                .filter(|(chord, _)| chord.matches(name, held))
                .map(|(_, action)| *action)
                .collect(),
            HookMode::Raw(sender) => {
                let raw = if pressed {
                    RawKeyEvent::Down(name.to_string())
                } else {
                    RawKeyEvent::Up(name.to_string())
                };
                if sender.send(raw).is_err() {
                    // Recorder finished and dropped its receiver.
                    *mode = HookMode::Detached;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    };

    // Sent outside the mode lock so a busy consumer cannot block bind/unbind.
    for action in fired {
        log::debug!("input-hook: '{name}' fired {action:?}");
        if let Err(e) = tx.try_send(action) {
            log::warn!("input-hook: dropping {action:?}: {e}");
        }
    }
}

impl HookShared {
    fn bind(&self, chord: Chord, action: HotkeyEvent) {
        let mut mode = lock(&self.mode);
        match &mut *mode {
            HookMode::Bound(bindings) => bindings.push((chord, action)),
            _ => *mode = HookMode::Bound(vec![(chord, action)]),
        }
    }
}

impl InputHook for RdevHook {
    fn bind(&self, hotkey: &str, action: HotkeyEvent) -> Result<(), RegistrationError> {
        if self._thread.is_none() {
            return Err(RegistrationError::Backend(
                "input-hook thread is not running".into(),
            ));
        }
        let chord = Chord::parse(hotkey)?;
        log::info!("input-hook: binding '{chord}' to {action:?}");
        self.shared.bind(chord, action);
        Ok(())
    }

    fn unbind_all(&self) {
        log::debug!("input-hook: unbinding all");
        *lock(&self.shared.mode) = HookMode::Detached;
    }

    fn subscribe_raw(&self) -> std_mpsc::Receiver<RawKeyEvent> {
        let (tx, rx) = std_mpsc::channel();
        *lock(&self.shared.mode) = HookMode::Raw(tx);
        rx
    }
}

impl Drop for RdevHook {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }
}
