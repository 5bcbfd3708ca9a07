//! UI actions and the table that routes them to the controller.
//!
//! Widgets never call the controller directly.  Each frame collects the
//! [`UiCommand`]s produced by clicks and hands them to
//! [`CommandDispatcher::dispatch`].

use std::sync::mpsc;
use std::sync::Arc;

use crate::config::{Settings, SettingsUpdate, Theme};
use crate::controller::ToggleController;
use crate::hotkey::RecorderUpdate;

/// Which form field a recording fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTarget {
    Hotkey,
    StopKey,
}

/// Raw text of the settings form.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub min_delay: String,
    pub max_delay: String,
    pub start_delay: String,
    pub hotkey: String,
    pub stop_key: String,
    pub theme: Theme,
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min_delay: settings.min_delay.to_string(),
            max_delay: settings.max_delay.to_string(),
            start_delay: settings.start_delay.to_string(),
            hotkey: settings.hotkey.clone(),
            stop_key: settings.stop_key.clone(),
            theme: settings.theme,
        }
    }

    /// Fill the field `target` refers to.
    pub fn set_key(&mut self, target: RecordTarget, value: String) {
        match target {
            RecordTarget::Hotkey => self.hotkey = value,
            RecordTarget::StopKey => self.stop_key = value,
        }
    }
}

/// Everything the window can ask of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Toggle,
    Save(SettingsForm),
    SetTheme(Theme),
    Record(RecordTarget),
}

/// Routes [`UiCommand`]s to [`ToggleController`] methods.
///
/// Recorder updates are forwarded on `record_tx` tagged with their target,
/// followed by a call to `notify` so the window can repaint.
pub struct CommandDispatcher {
    controller: Arc<ToggleController>,
    record_tx: mpsc::Sender<(RecordTarget, RecorderUpdate)>,
    notify: Arc<dyn Fn() + Send + Sync>,
}

impl CommandDispatcher {
    pub fn new(
        controller: Arc<ToggleController>,
        record_tx: mpsc::Sender<(RecordTarget, RecorderUpdate)>,
        notify: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            controller,
            record_tx,
            notify,
        }
    }

    pub fn controller(&self) -> &Arc<ToggleController> {
        &self.controller
    }

    pub fn dispatch(&self, command: UiCommand) {
        log::debug!("ui command: {command:?}");
        match command {
            UiCommand::Toggle => {
                // Failures are already on the status line.
                let _ = self.controller.toggle();
            }
            UiCommand::Save(form) => self.save(&form),
            UiCommand::SetTheme(theme) => self.controller.apply_theme(theme),
            UiCommand::Record(target) => self.record(target),
        }
    }

    fn save(&self, form: &SettingsForm) {
        let update = match SettingsUpdate::from_form(
            &form.min_delay,
            &form.max_delay,
            &form.start_delay,
            &form.hotkey,
            &form.stop_key,
            form.theme,
        ) {
            Ok(update) => update,
            Err(e) => {
                log::warn!("invalid settings form: {e}");
                self.controller.status_line().set(format!("Error: {e}"));
                return;
            }
        };
        let _ = self.controller.update_settings(update);
    }

    fn record(&self, target: RecordTarget) {
        let tx = self.record_tx.clone();
        let notify = Arc::clone(&self.notify);
        let on_update = move |update: RecorderUpdate| {
            let _ = tx.send((target, update));
            notify();
        };

        let started = match target {
            RecordTarget::Hotkey => self.controller.record_hotkey(on_update),
            RecordTarget::StopKey => self.controller.record_stop_key(on_update),
        };
        if let Err(e) = started {
            log::warn!("cannot record {target:?}: {e}");
            self.controller.status_line().set(format!("Error: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::{RawKeyEvent, RecordMode};
    use crate::testing::{instant_settings, Harness};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Setup {
        h: Harness,
        dispatcher: CommandDispatcher,
        rx: mpsc::Receiver<(RecordTarget, RecorderUpdate)>,
        repaints: Arc<AtomicUsize>,
    }

    fn setup() -> Setup {
        setup_with(Harness::new(instant_settings()))
    }

    fn setup_with(h: Harness) -> Setup {
        let (tx, rx) = mpsc::channel();
        let repaints = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&repaints);
        let dispatcher = CommandDispatcher::new(
            Arc::clone(&h.controller),
            tx,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        Setup {
            h,
            dispatcher,
            rx,
            repaints,
        }
    }

    fn form(s: &Setup) -> SettingsForm {
        SettingsForm::from_settings(&s.h.controller.settings())
    }

    #[test]
    fn save_applies_form_and_persists() {
        let s = setup();
        let mut f = form(&s);
        f.min_delay = "0.2".into();
        f.max_delay = "0.1".into();
        f.hotkey = "ctrl alt k".into();
        f.theme = Theme::Dark;

        s.dispatcher.dispatch(UiCommand::Save(f));

        let saved = s.h.saved();
        assert_eq!((saved.min_delay, saved.max_delay), (0.1, 0.2));
        assert_eq!(saved.hotkey, "ctrl+alt+k");
        assert_eq!(saved.theme, Theme::Dark);
        assert_eq!(
            s.h.controller.status(),
            "Settings saved. Hotkey 'ctrl+alt+k' registered"
        );
    }

    #[test]
    fn save_with_bad_number_reports_field() {
        let s = setup();
        let mut f = form(&s);
        f.start_delay = "soon".into();

        s.dispatcher.dispatch(UiCommand::Save(f));

        let status = s.h.controller.status();
        assert!(status.starts_with("Error:"), "{status}");
        assert!(status.contains("start_delay"), "{status}");
        assert!(!s.h.dir.path().join("settings.json").exists());
    }

    #[test]
    fn theme_and_toggle_reach_controller() {
        let s = setup();
        s.dispatcher.dispatch(UiCommand::SetTheme(Theme::Hacker));
        assert_eq!(s.h.controller.settings().theme, Theme::Hacker);

        s.dispatcher.dispatch(UiCommand::Toggle);
        s.h.controller.wait_idle();
        assert_eq!(s.h.typed(), "hello");
    }

    #[test]
    fn recording_updates_are_tagged_and_repaint() {
        let s = setup();
        s.dispatcher.dispatch(UiCommand::Record(RecordTarget::StopKey));
        s.h.hook.press(&[RawKeyEvent::Down("f8".into())]);

        let mut last = None;
        while let Ok((target, update)) = s.rx.recv_timeout(Duration::from_secs(5)) {
            assert_eq!(target, RecordTarget::StopKey);
            let done = matches!(update, RecorderUpdate::Finished(_));
            last = Some(update);
            if done {
                break;
            }
        }
        assert_eq!(last, Some(RecorderUpdate::Finished("f8".into())));
        assert!(s.repaints.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn second_recording_is_reported() {
        let s = setup();
        s.dispatcher.dispatch(UiCommand::Record(RecordTarget::Hotkey));
        s.dispatcher.dispatch(UiCommand::Record(RecordTarget::StopKey));
        assert!(s.h.controller.status().contains("already in progress"));
    }

    #[test]
    fn save_during_recording_keeps_placeholder_out_of_file() {
        let s = setup_with(Harness::slow_recording(instant_settings()));
        s.dispatcher.dispatch(UiCommand::Record(RecordTarget::Hotkey));
        let mut f = form(&s);
        f.hotkey = RecordMode::Combo.placeholder().into();

        s.dispatcher.dispatch(UiCommand::Save(f));

        assert_eq!(
            s.h.controller.status(),
            "Error: Finish recording the key before saving"
        );
        assert_eq!(s.h.controller.settings().hotkey, "ctrl+shift+t");
        assert!(!s.h.dir.path().join("settings.json").exists());
    }

    #[test]
    fn recorded_value_fills_matching_field() {
        let mut f = SettingsForm::from_settings(&Settings::default());
        f.set_key(RecordTarget::StopKey, "f8".into());
        f.set_key(RecordTarget::Hotkey, "alt+q".into());
        assert_eq!((f.hotkey.as_str(), f.stop_key.as_str()), ("alt+q", "f8"));
    }
}
