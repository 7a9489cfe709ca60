//! Character to HID key code tables.
//!
//! Two layouts are supported: US (ANSI) and JIS (Japanese 109-key). Letters
//! and digits share positions across both; symbols differ.

use log::debug;

/// USB HID keyboard usage id (usage page 0x07).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct KeyCode(u8);

impl KeyCode {
    pub const A: Self = Self(0x04);
    pub const ONE: Self = Self(0x1E);
    pub const ZERO: Self = Self(0x27);
    pub const ENTER: Self = Self(0x28);
    pub const BACKSPACE: Self = Self(0x2A);
    pub const SPACE: Self = Self(0x2C);
    pub const MINUS: Self = Self(0x2D);
    pub const EQUALS: Self = Self(0x2E);
    pub const LEFT_BRACKET: Self = Self(0x2F);
    pub const RIGHT_BRACKET: Self = Self(0x30);
    pub const BACKSLASH: Self = Self(0x31);
    pub const NON_US_HASH: Self = Self(0x32);
    pub const SEMICOLON: Self = Self(0x33);
    pub const QUOTE: Self = Self(0x34);
    pub const GRAVE: Self = Self(0x35);
    pub const COMMA: Self = Self(0x36);
    pub const PERIOD: Self = Self(0x37);
    pub const SLASH: Self = Self(0x38);
    /// JIS "ro" key (`\` / `_`).
    pub const INTERNATIONAL1: Self = Self(0x87);
    /// JIS yen key (`¥` / `|`).
    pub const INTERNATIONAL3: Self = Self(0x89);

    pub const fn from_usage(usage: u8) -> Self {
        Self(usage)
    }

    pub const fn usage(self) -> u8 {
        self.0
    }
}

/// How one character is typed on a given layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub needs_shift: bool,
}

impl KeyBinding {
    const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            needs_shift: false,
        }
    }

    const fn shifted(key: KeyCode) -> Self {
        Self {
            key,
            needs_shift: true,
        }
    }
}

/// Host keyboard layout the device pretends to be.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum KeyboardLayout {
    #[default]
    Us,
    Jis,
}

impl KeyboardLayout {
    /// Parses a configuration value. Unknown names fall back to the default
    /// layout without complaint.
    pub fn from_name(name: &str) -> Self {
        match name {
            "US" => Self::Us,
            "JIS" => Self::Jis,
            other => {
                debug!("keymap: unrecognised layout {:?}; using US", other);
                Self::default()
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Jis => "JIS",
        }
    }

    pub fn binding(self, ch: char) -> Option<KeyBinding> {
        if let Some(key) = alphanumeric_key(ch) {
            return Some(KeyBinding::plain(key));
        }

        match ch {
            ' ' => Some(KeyBinding::plain(KeyCode::SPACE)),
            '\n' => Some(KeyBinding::plain(KeyCode::ENTER)),
            _ => match self {
                Self::Us => us_symbol(ch),
                Self::Jis => jis_symbol(ch),
            },
        }
    }
}

fn alphanumeric_key(ch: char) -> Option<KeyCode> {
    match ch {
        'a'..='z' => Some(KeyCode(KeyCode::A.0 + (ch as u8 - b'a'))),
        '1'..='9' => Some(KeyCode(KeyCode::ONE.0 + (ch as u8 - b'1'))),
        '0' => Some(KeyCode::ZERO),
        _ => None,
    }
}

fn digit_key(digit: u8) -> KeyCode {
    if digit == 0 {
        KeyCode::ZERO
    } else {
        KeyCode(KeyCode::ONE.0 + digit - 1)
    }
}

fn us_symbol(ch: char) -> Option<KeyBinding> {
    use KeyBinding as B;
    use KeyCode as K;

    let binding = match ch {
        '!' => B::shifted(digit_key(1)),
        '@' => B::shifted(digit_key(2)),
        '#' => B::shifted(digit_key(3)),
        '$' => B::shifted(digit_key(4)),
        '%' => B::shifted(digit_key(5)),
        '^' => B::shifted(digit_key(6)),
        '&' => B::shifted(digit_key(7)),
        '*' => B::shifted(digit_key(8)),
        '(' => B::shifted(digit_key(9)),
        ')' => B::shifted(digit_key(0)),
        '-' => B::plain(K::MINUS),
        '_' => B::shifted(K::MINUS),
        '=' => B::plain(K::EQUALS),
        '+' => B::shifted(K::EQUALS),
        '[' => B::plain(K::LEFT_BRACKET),
        '{' => B::shifted(K::LEFT_BRACKET),
        ']' => B::plain(K::RIGHT_BRACKET),
        '}' => B::shifted(K::RIGHT_BRACKET),
        '\\' => B::plain(K::BACKSLASH),
        '|' => B::shifted(K::BACKSLASH),
        ';' => B::plain(K::SEMICOLON),
        ':' => B::shifted(K::SEMICOLON),
        '\'' => B::plain(K::QUOTE),
        '"' => B::shifted(K::QUOTE),
        '`' => B::plain(K::GRAVE),
        '~' => B::shifted(K::GRAVE),
        ',' => B::plain(K::COMMA),
        '<' => B::shifted(K::COMMA),
        '.' => B::plain(K::PERIOD),
        '>' => B::shifted(K::PERIOD),
        '/' => B::plain(K::SLASH),
        '?' => B::shifted(K::SLASH),
        _ => return None,
    };
    Some(binding)
}

fn jis_symbol(ch: char) -> Option<KeyBinding> {
    use KeyBinding as B;
    use KeyCode as K;

    let binding = match ch {
        '!' => B::shifted(digit_key(1)),
        '"' => B::shifted(digit_key(2)),
        '#' => B::shifted(digit_key(3)),
        '$' => B::shifted(digit_key(4)),
        '%' => B::shifted(digit_key(5)),
        '&' => B::shifted(digit_key(6)),
        '\'' => B::shifted(digit_key(7)),
        '(' => B::shifted(digit_key(8)),
        ')' => B::shifted(digit_key(9)),
        '-' => B::plain(K::MINUS),
        '=' => B::shifted(K::MINUS),
        '^' => B::plain(K::EQUALS),
        '~' => B::shifted(K::EQUALS),
        '@' => B::plain(K::LEFT_BRACKET),
        '`' => B::shifted(K::LEFT_BRACKET),
        '[' => B::plain(K::RIGHT_BRACKET),
        '{' => B::shifted(K::RIGHT_BRACKET),
        ']' => B::plain(K::NON_US_HASH),
        '}' => B::shifted(K::NON_US_HASH),
        ';' => B::plain(K::SEMICOLON),
        '+' => B::shifted(K::SEMICOLON),
        ':' => B::plain(K::QUOTE),
        '*' => B::shifted(K::QUOTE),
        '\\' => B::plain(K::INTERNATIONAL3),
        '|' => B::shifted(K::INTERNATIONAL3),
        '_' => B::shifted(K::INTERNATIONAL1),
        ',' => B::plain(K::COMMA),
        '<' => B::shifted(K::COMMA),
        '.' => B::plain(K::PERIOD),
        '>' => B::shifted(K::PERIOD),
        '/' => B::plain(K::SLASH),
        '?' => B::shifted(K::SLASH),
        _ => return None,
    };
    Some(binding)
}
