//! Clipboard typing simulator.
//!
//! Types the clipboard into the focused window one character at a time with
//! randomised delays.  A global hotkey starts and stops typing; a second key
//! stops it in an emergency.  Both keys can be recorded from the settings
//! window.

pub mod app;
pub mod config;
pub mod controller;
pub mod hotkey;
pub mod inject;
pub mod typing;

#[cfg(test)]
pub(crate) mod testing;
