//! Key names.
//!
//! Hotkeys are stored and displayed as lowercase names (`"ctrl"`, `"t"`,
//! `"f9"`, `"esc"`, `"page up"`).  Raw events from `rdev` are converted with
//! [`key_name`]; names typed by the user or read from the settings file are
//! folded onto the same vocabulary with [`normalize_name`].

/// Modifier names in canonical order.
pub const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "win"];

/// Position of `name` in the canonical modifier order, or `None` when it is
/// not a modifier.
pub fn modifier_rank(name: &str) -> Option<usize> {
    MODIFIERS.iter().position(|m| *m == name)
}

pub fn is_modifier(name: &str) -> bool {
    modifier_rank(name).is_some()
}

/// Fold platform aliases onto the canonical name.
///
/// ```
/// use clipboard_typer::hotkey::keys::normalize_name;
///
/// assert_eq!(normalize_name("Control"), "ctrl");
/// assert_eq!(normalize_name("windows"), "win");
/// assert_eq!(normalize_name("Escape"), "esc");
/// assert_eq!(normalize_name("T"), "t");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let name = match lower.as_str() {
        "control" | "left ctrl" | "right ctrl" | "left control" | "right control" => "ctrl",
        "windows" | "left windows" | "right windows" | "super" | "meta" | "cmd" | "command" => {
            "win"
        }
        "option" | "alt gr" | "altgr" | "left alt" | "right alt" => "alt",
        "left shift" | "right shift" => "shift",
        "escape" => "esc",
        "return" => "enter",
        "del" => "delete",
        "pageup" | "page_up" => "page up",
        "pagedown" | "page_down" => "page down",
        "capslock" | "caps_lock" => "caps lock",
        other => other,
    };
    name.to_string()
}

/// Name of an `rdev` key, or `None` for keys without a stable name.
pub fn key_name(key: rdev::Key) -> Option<&'static str> {
    use rdev::Key::*;

    let name = match key {
        ControlLeft | ControlRight => "ctrl",
        Alt | AltGr => "alt",
        ShiftLeft | ShiftRight => "shift",
        MetaLeft | MetaRight => "win",

        F1 => "f1",
        F2 => "f2",
        F3 => "f3",
        F4 => "f4",
        F5 => "f5",
        F6 => "f6",
        F7 => "f7",
        F8 => "f8",
        F9 => "f9",
        F10 => "f10",
        F11 => "f11",
        F12 => "f12",

        Escape => "esc",
        Space => "space",
        Return | KpReturn => "enter",
        Tab => "tab",
        Backspace => "backspace",
        Delete | KpDelete => "delete",
        Insert => "insert",
        Home => "home",
        End => "end",
        PageUp => "page up",
        PageDown => "page down",
        UpArrow => "up",
        DownArrow => "down",
        LeftArrow => "left",
        RightArrow => "right",
        CapsLock => "caps lock",
        NumLock => "num lock",
        ScrollLock => "scroll lock",
        PrintScreen => "print screen",
        Pause => "pause",

        KeyA => "a",
        KeyB => "b",
        KeyC => "c",
        KeyD => "d",
        KeyE => "e",
        KeyF => "f",
        KeyG => "g",
        KeyH => "h",
        KeyI => "i",
        KeyJ => "j",
        KeyK => "k",
        KeyL => "l",
        KeyM => "m",
        KeyN => "n",
        KeyO => "o",
        KeyP => "p",
        KeyQ => "q",
        KeyR => "r",
        KeyS => "s",
        KeyT => "t",
        KeyU => "u",
        KeyV => "v",
        KeyW => "w",
        KeyX => "x",
        KeyY => "y",
        KeyZ => "z",

        Num0 | Kp0 => "0",
        Num1 | Kp1 => "1",
        Num2 | Kp2 => "2",
        Num3 | Kp3 => "3",
        Num4 | Kp4 => "4",
        Num5 | Kp5 => "5",
        Num6 | Kp6 => "6",
        Num7 | Kp7 => "7",
        Num8 | Kp8 => "8",
        Num9 | Kp9 => "9",

        Minus | KpMinus => "-",
        Equal => "=",
        LeftBracket => "[",
        RightBracket => "]",
        SemiColon => ";",
        Quote => "'",
        BackQuote => "`",
        BackSlash | IntlBackslash => "\\",
        Comma => ",",
        Dot => ".",
        Slash | KpDivide => "/",
        KpPlus => "plus",
        KpMultiply => "*",

        _ => return None,
    };
    Some(name)
}

/// Whether `name` is something [`key_name`] can produce, i.e. a key the
/// global hook is able to match.
pub fn is_known_name(name: &str) -> bool {
    KNOWN_NAMES.contains(&name)
}

const KNOWN_NAMES: &[&str] = &[
    "ctrl", "alt", "shift", "win", "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10",
    "f11", "f12", "esc", "space", "enter", "tab", "backspace", "delete", "insert", "home", "end",
    "page up", "page down", "up", "down", "left", "right", "caps lock", "num lock",
    "scroll lock", "print screen", "pause", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j",
    "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "0", "1",
    "2", "3", "4", "5", "6", "7", "8", "9", "-", "=", "[", "]", ";", "'", "`", "\\", ",", ".",
    "/", "plus", "*",
];
