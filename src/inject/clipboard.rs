//! Clipboard reads backed by the `arboard` crate.
//!
//! A short-lived [`arboard::Clipboard`] handle is opened per read rather than
//! shared, because `arboard::Clipboard` is not `Send` on all platforms and the
//! handle is cheap to create.

use arboard::Clipboard;

use super::{ClipboardSource, InjectError};

/// The OS clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    /// Returns `Ok(None)` when the clipboard is empty or contains non-text
    /// data (e.g. an image).  Never errors just because it is empty.
    ///
    /// # Errors
    ///
    /// [`InjectError::ClipboardAccess`] if the OS clipboard cannot be opened.
    fn read_text(&self) -> Result<Option<String>, InjectError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| InjectError::ClipboardAccess(e.to_string()))?;
        // `get_text` errs when empty or non-text; treat both as None
        Ok(clipboard.get_text().ok().filter(|text| !text.is_empty()))
    }
}
