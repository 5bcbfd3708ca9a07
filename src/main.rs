//! Application entry point — Clipboard Typing Simulator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`Settings`] from the working directory (defaults on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 1 worker).
//! 4. Start the `rdev` input hook and build the [`ToggleController`].
//! 5. Register the hotkeys and spawn the hotkey dispatcher.
//! 6. Run [`eframe::run_native`]; blocks until the window is closed.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use eframe::egui;
use tokio::sync::mpsc;

use clipboard_typer::{
    app::{TyperApp, TITLE},
    config::{Settings, SETTINGS_FILE},
    controller::{run_hotkey_dispatch, ToggleController},
    hotkey::{HotkeyEvent, RdevHook},
    inject::{EnigoBackend, SystemClipboard},
};

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_title(TITLE)
        .with_inner_size([400.0, 470.0])
        .with_resizable(false)
        .with_always_on_top();

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Clipboard Typing Simulator starting up");

    // 2. Settings
    let settings_path = Path::new(SETTINGS_FILE);
    let settings = Settings::load_or_default(settings_path);
    log::info!("loaded settings: {settings:?}");

    // 3. Tokio runtime (one worker is plenty for hotkey dispatch)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Input hook + controller
    let (hotkey_tx, hotkey_rx) = mpsc::channel::<HotkeyEvent>(16);
    let hook = Arc::new(RdevHook::start(hotkey_tx));
    let controller = Arc::new(ToggleController::new(
        settings,
        settings_path,
        hook,
        Arc::new(EnigoBackend),
        Arc::new(SystemClipboard),
    ));

    // 5. Hotkeys; failures are shown in the window
    if let Err(e) = controller.register_hotkeys() {
        log::warn!("starting without a working hotkey: {e}");
    }
    rt.spawn(run_hotkey_dispatch(Arc::clone(&controller), hotkey_rx));

    // 6. Window
    eframe::run_native(
        TITLE,
        native_options(),
        Box::new(move |cc| Ok(Box::new(TyperApp::new(cc, controller)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    rt.shutdown_background();
    log::info!("Clipboard Typing Simulator stopped");
    Ok(())
}
