//! Parsed hotkey strings.
//!
//! A hotkey string is a `+`-joined list of key names: modifiers in canonical
//! order (`ctrl`, `alt`, `shift`, `win`) followed by one non-modifier key,
//! e.g. `"ctrl+shift+t"`.  The emergency stop key is usually a single name
//! such as `"esc"`.

use std::fmt;

use super::keys::{is_known_name, modifier_rank, normalize_name, MODIFIERS};
use super::RegistrationError;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Set of held modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);

    /// Add the modifier called `name`.  Returns `false` when `name` is not a
    /// modifier.
    pub fn insert(&mut self, name: &str) -> bool {
        match modifier_rank(name) {
            Some(rank) => {
                self.0 |= 1 << rank;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, name: &str) {
        if let Some(rank) = modifier_rank(name) {
            self.0 &= !(1 << rank);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        modifier_rank(name).is_some_and(|rank| self.0 & (1 << rank) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Held modifier names in canonical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        MODIFIERS
            .iter()
            .enumerate()
            .filter(|(rank, _)| self.0 & (1 << rank) != 0)
            .map(|(_, name)| *name)
    }
}

// ---------------------------------------------------------------------------
// Chord
// ---------------------------------------------------------------------------

/// A bindable key combination: zero or more modifiers plus one trigger key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Chord {
    /// Parse a hotkey string.
    ///
    /// Names are alias-folded, so `"Control+Shift+T"` and `"ctrl+shift+t"`
    /// parse to the same chord.  A string made only of modifiers uses its
    /// last modifier as the trigger key (`"shift"` binds the shift key itself).
    ///
    /// ```
    /// use clipboard_typer::hotkey::Chord;
    ///
    /// let chord = Chord::parse("Shift+Control+T").unwrap();
    /// assert_eq!(chord.to_string(), "ctrl+shift+t");
    /// assert_eq!(Chord::parse("esc").unwrap().to_string(), "esc");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RegistrationError> {
        if raw.trim().is_empty() {
            return Err(RegistrationError::Empty);
        }

        let mut modifiers = Modifiers::NONE;
        let mut last_modifier = None;
        let mut key: Option<String> = None;

        for token in raw.split('+') {
            let name = normalize_name(token);
            if name.is_empty() {
                return Err(RegistrationError::Malformed(raw.to_string()));
            }
            if !is_known_name(&name) {
                return Err(RegistrationError::UnknownKey(name));
            }
            if modifiers.insert(&name) {
                last_modifier = Some(name);
                continue;
            }
            if key.is_some() {
                return Err(RegistrationError::Malformed(raw.to_string()));
            }
            key = Some(name);
        }

        let key = match (key, last_modifier) {
            (Some(key), _) => key,
            (None, Some(modifier)) => {
                modifiers.remove(&modifier);
                modifier
            }
            (None, None) => return Err(RegistrationError::Empty),
        };

        Ok(Self { modifiers, key })
    }

    /// Whether pressing `key` while exactly `held` modifiers are down fires
    /// this chord.  The trigger key itself is ignored in `held` so that
    /// modifier-only chords match.
    pub fn matches(&self, key: &str, held: Modifiers) -> bool {
        if key != self.key {
            return false;
        }
        let mut held = held;
        held.remove(key);
        held == self.modifiers
    }

    /// A bare printable key (`"a"`, `"1"`) with no modifiers.
    pub fn is_plain_printable(&self) -> bool {
        self.modifiers.is_empty() && self.key.chars().count() == 1
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.modifiers.names() {
            write!(f, "{name}+")?;
        }
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_combo() {
        let chord = Chord::parse("ctrl+shift+t").unwrap();
        assert!(chord.modifiers.contains("ctrl"));
        assert!(chord.modifiers.contains("shift"));
        assert!(!chord.modifiers.contains("alt"));
        assert_eq!(chord.key, "t");
    }

    #[test]
    fn display_uses_canonical_modifier_order() {
        assert_eq!(Chord::parse("win+shift+alt+ctrl+k").unwrap().to_string(), "ctrl+alt+shift+win+k");
        assert_eq!(Chord::parse("windows+control+F5").unwrap().to_string(), "ctrl+win+f5");
    }

    #[test]
    fn single_key() {
        let chord = Chord::parse("esc").unwrap();
        assert!(chord.modifiers.is_empty());
        assert_eq!(chord.key, "esc");
    }

    #[test]
    fn modifier_only_uses_last_modifier_as_key() {
        let chord = Chord::parse("ctrl+shift").unwrap();
        assert_eq!(chord.key, "shift");
        assert!(chord.modifiers.contains("ctrl"));
        assert!(!chord.modifiers.contains("shift"));
    }

    #[test]
    fn rejects_bad_strings() {
        assert!(matches!(Chord::parse(""), Err(RegistrationError::Empty)));
        assert!(matches!(Chord::parse("ctrl++t"), Err(RegistrationError::Malformed(_))));
        assert!(matches!(Chord::parse("ctrl+a+b"), Err(RegistrationError::Malformed(_))));
        assert!(matches!(Chord::parse("ctrl+hyper"), Err(RegistrationError::UnknownKey(k)) if k == "hyper"));
    }

    #[test]
    fn matches_requires_exact_modifiers() {
        let chord = Chord::parse("ctrl+shift+t").unwrap();
        let mut held = Modifiers::NONE;
        held.insert("ctrl");
        assert!(!chord.matches("t", held));
        held.insert("shift");
        assert!(chord.matches("t", held));
        assert!(!chord.matches("y", held));
        held.insert("alt");
        assert!(!chord.matches("t", held));
    }

    #[test]
    fn modifier_chord_matches_with_itself_held() {
        let chord = Chord::parse("shift").unwrap();
        let mut held = Modifiers::NONE;
        held.insert("shift");
        assert!(chord.matches("shift", held));
    }

    #[test]
    fn plain_printable_detection() {
        assert!(Chord::parse("a").unwrap().is_plain_printable());
        assert!(!Chord::parse("esc").unwrap().is_plain_printable());
        assert!(!Chord::parse("ctrl+a").unwrap().is_plain_printable());
    }
}
