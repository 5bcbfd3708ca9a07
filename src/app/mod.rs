//! Settings window — egui/eframe application.
//!
//! # Architecture
//!
//! [`TyperApp`] is the top-level [`eframe::App`].  It owns the editable
//! [`SettingsForm`] and a [`CommandDispatcher`]; everything else lives in the
//! shared [`ToggleController`](crate::controller::ToggleController).
//!
//! The window is repainted every 100 ms so the status line and the
//! Start/Stop label track state changed by global hotkeys or the typing
//! thread.  Recorder updates arrive on a `std::sync::mpsc` channel and are
//! drained at the start of each frame.
//!
//! # Layout
//!
//! | Section | Widgets |
//! |---------|---------|
//! | Typing Settings | min / max / start delay text fields |
//! | Hotkeys | start/stop hotkey and stop key fields, each with **Record** |
//! | Theme | light / dark / hacker radio buttons |
//! | Actions | **Save Settings**, **Start Typing** / **Stop Typing** |
//! | Footer | status line, info text |

pub mod command;
pub mod theme;

pub use command::{CommandDispatcher, RecordTarget, SettingsForm, UiCommand};

use std::sync::{mpsc, Arc};
use std::time::Duration;

use eframe::egui;

use crate::config::Theme;
use crate::controller::ToggleController;
use crate::hotkey::{RecordMode, RecorderUpdate};

/// Window title.
pub const TITLE: &str = "Clipboard Typing Simulator";

/// Status polling interval.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// eframe application — the settings window.
pub struct TyperApp {
    form: SettingsForm,
    dispatcher: CommandDispatcher,
    record_rx: mpsc::Receiver<(RecordTarget, RecorderUpdate)>,
    /// Theme currently installed in the egui context.
    applied_theme: Option<Theme>,
}

impl TyperApp {
    pub fn new(cc: &eframe::CreationContext<'_>, controller: Arc<ToggleController>) -> Self {
        let (record_tx, record_rx) = mpsc::channel();
        let ctx = cc.egui_ctx.clone();
        let notify = Arc::new(move || ctx.request_repaint());

        Self {
            form: SettingsForm::from_settings(&controller.settings()),
            dispatcher: CommandDispatcher::new(controller, record_tx, notify),
            record_rx,
            applied_theme: None,
        }
    }

    fn controller(&self) -> &ToggleController {
        self.dispatcher.controller()
    }

    fn poll_recorder(&mut self) {
        while let Ok((target, update)) = self.record_rx.try_recv() {
            match update {
                RecorderUpdate::Candidate(text) | RecorderUpdate::Finished(text) => {
                    self.form.set_key(target, text);
                }
            }
        }
    }

    fn sync_theme(&mut self, ctx: &egui::Context) {
        let theme = self.controller().settings().theme;
        if self.applied_theme != Some(theme) {
            log::info!("applying {} theme", theme.name());
            ctx.set_visuals(theme::visuals(theme));
            self.applied_theme = Some(theme);
        }
    }

    fn draw_delays(&mut self, ui: &mut egui::Ui) {
        ui.heading("Typing Settings");
        egui::Grid::new("delays")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for (label, value) in [
                    ("Min delay (seconds):", &mut self.form.min_delay),
                    ("Max delay (seconds):", &mut self.form.max_delay),
                    ("Start delay (seconds):", &mut self.form.start_delay),
                ] {
                    ui.label(label);
                    ui.add(egui::TextEdit::singleline(value).desired_width(80.0));
                    ui.end_row();
                }
            });
    }

    fn draw_keys(&mut self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) {
        let recording = self.controller().is_recording();

        ui.heading("Hotkeys");
        egui::Grid::new("keys")
            .num_columns(3)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for (label, target, value) in [
                    ("Start/Stop hotkey:", RecordTarget::Hotkey, &mut self.form.hotkey),
                    ("Emergency stop key:", RecordTarget::StopKey, &mut self.form.stop_key),
                ] {
                    ui.label(label);
                    ui.add_enabled(
                        !recording,
                        egui::TextEdit::singleline(value).desired_width(140.0),
                    );
                    if ui
                        .add_enabled(!recording, egui::Button::new("Record"))
                        .on_hover_text(match target {
                            RecordTarget::Hotkey => RecordMode::Combo.placeholder(),
                            RecordTarget::StopKey => RecordMode::Single.placeholder(),
                        })
                        .clicked()
                    {
                        commands.push(UiCommand::Record(target));
                    }
                    ui.end_row();
                }
            });
    }

    fn draw_theme(&mut self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) {
        ui.heading("Theme");
        ui.horizontal(|ui| {
            for theme in Theme::ALL {
                if ui
                    .radio_value(&mut self.form.theme, theme, theme.label())
                    .clicked()
                {
                    commands.push(UiCommand::SetTheme(theme));
                }
            }
        });
    }

    fn draw_actions(&mut self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) {
        let typing = self.controller().is_typing();
        let recording = self.controller().is_recording();
        let toggle_label = if typing { "Stop Typing" } else { "Start Typing" };

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!recording, egui::Button::new("Save Settings"))
                .clicked()
            {
                commands.push(UiCommand::Save(self.form.clone()));
            }
            // Stopping stays available during a recording.
            if ui
                .add_enabled(typing || !recording, egui::Button::new(toggle_label))
                .clicked()
            {
                commands.push(UiCommand::Toggle);
            }
        });
    }

    fn draw_footer(&self, ui: &mut egui::Ui) {
        let controller = self.controller();
        ui.label(egui::RichText::new(controller.status()).strong());
        ui.add_space(4.0);
        ui.label(egui::RichText::new(controller.settings().info_text()).small());
    }
}

impl eframe::App for TyperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_recorder();
        self.sync_theme(ctx);

        let mut commands = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_delays(ui);
            ui.separator();
            self.draw_keys(ui, &mut commands);
            ui.separator();
            self.draw_theme(ui, &mut commands);
            ui.separator();
            self.draw_actions(ui, &mut commands);
            ui.separator();
            self.draw_footer(ui);
        });

        for command in commands {
            self.dispatcher.dispatch(command);
        }

        ctx.request_repaint_after(POLL_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("settings window closing");
        self.controller().shutdown();
    }
}
