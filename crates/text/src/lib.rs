//! Legacy color codes as they appear in player-facing text.
//!
//! Message authors write codes with an alternate character (usually `&`), which
//! [`translate_color_codes`] turns into the native `§` form.

use serde::Serialize;

/// The native color escape character.
pub const SECTION_SIGN: char = '§';

/// Lead code of a `§x§r§r§g§g§b§b` hex color sequence.
const HEX_CODE: char = 'x';

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        use ColorCode::*;
        match self {
            Black => '0',
            DarkBlue => '1',
            DarkGreen => '2',
            DarkAqua => '3',
            DarkRed => '4',
            DarkPurple => '5',
            Gold => '6',
            Gray => '7',
            DarkGray => '8',
            Blue => '9',
            Green => 'a',
            Aqua => 'b',
            Red => 'c',
            LightPurple => 'd',
            Yellow => 'e',
            White => 'f',
            Obfuscated => 'k',
            Bold => 'l',
            Strikethrough => 'm',
            Underline => 'n',
            Italic => 'o',
            Reset => 'r',
        }
    }

    pub fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(
            self,
            Obfuscated | Bold | Strikethrough | Underline | Italic | Reset
        )
    }

    /// The ANSI SGR parameter closest to this code.
    pub fn ansi_code(self) -> u8 {
        use ColorCode::*;
        match self {
            Black => 30,
            DarkBlue => 34,
            DarkGreen => 32,
            DarkAqua => 36,
            DarkRed => 31,
            DarkPurple => 35,
            Gold => 33,
            Gray => 37,
            DarkGray => 90,
            Blue => 94,
            Green => 92,
            Aqua => 96,
            Red => 91,
            LightPurple => 95,
            Yellow => 93,
            White => 97,
            Obfuscated => 8,
            Bold => 1,
            Strikethrough => 9,
            Underline => 4,
            Italic => 3,
            Reset => 0,
        }
    }
}

fn is_code_char(code: char) -> bool {
    code.eq_ignore_ascii_case(&HEX_CODE) || ColorCode::parse(code).is_some()
}

/// Replaces every `alt` followed by a recognized code character with
/// [`SECTION_SIGN`] and the lower-cased code. Anything else is copied verbatim.
pub fn translate_color_codes(alt: char, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == alt {
            if let Some(&code) = chars.peek() {
                if is_code_char(code) {
                    chars.next();
                    out.push(SECTION_SIGN);
                    out.push(code.to_ascii_lowercase());
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Removes every native color sequence from `text`.
pub fn strip_colors(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == SECTION_SIGN {
            if let Some(&code) = chars.peek() {
                if is_code_char(code) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Renders native color sequences as ANSI escapes for a terminal.
///
/// A color code resets any formatting before it, the same way the client does.
/// Hex colors have no terminal counterpart and are dropped.
pub fn to_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut colored = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == SECTION_SIGN {
            if let Some(&code) = chars.peek() {
                if let Some(color) = ColorCode::parse(code) {
                    chars.next();
                    if !color.is_formatting() {
                        out.push_str("\x1b[0m");
                    }
                    out.push_str(&format!("\x1b[{}m", color.ansi_code()));
                    colored = color != ColorCode::Reset;
                    continue;
                }
                if code.eq_ignore_ascii_case(&HEX_CODE) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    if colored {
        out.push_str("\x1b[0m");
    }
    out
}
