//! Keystroke synthesis backed by the `enigo` crate.
//!
//! Printable characters are sent as Unicode key clicks; a few control
//! characters map to named keys:
//!
//! | Char   | Key    |
//! |--------|--------|
//! | `\n`, `\r` | Enter  |
//! | `\t`   | Tab    |
//! | `\x08` | Backspace |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::{InjectError, KeyboardBackend, Keystroker};

/// Opens an [`EnigoKeystroker`] per typing session.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnigoBackend;

impl KeyboardBackend for EnigoBackend {
    fn open(&self) -> Result<Box<dyn Keystroker>, InjectError> {
        Ok(Box::new(EnigoKeystroker::new()?))
    }
}

/// A live enigo connection.  Not `Send`; create it on the typing thread.
pub struct EnigoKeystroker {
    enigo: Enigo,
}

impl EnigoKeystroker {
    pub fn new() -> Result<Self, InjectError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| InjectError::Backend(e.to_string()))?;
        Ok(Self { enigo })
    }
}

/// Key to click for `ch`, or `None` for characters with no keystroke.
pub fn key_for_char(ch: char) -> Option<Key> {
    match ch {
        '\n' | '\r' => Some(Key::Return),
        '\t' => Some(Key::Tab),
        '\u{8}' => Some(Key::Backspace),
        c if c.is_control() => None,
        c => Some(Key::Unicode(c)),
    }
}

impl Keystroker for EnigoKeystroker {
    fn type_char(&mut self, ch: char) -> Result<(), InjectError> {
        let key = key_for_char(ch).ok_or(InjectError::UnsupportedChar(ch))?;
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| InjectError::KeySimulation(e.to_string()))
    }
}
