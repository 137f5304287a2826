//! Section-sign formatting codes (`§a`, `§l`, ...) and their terminal rendering
use std::fmt;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

/// Marker that introduces a formatting code
pub const SECTION: char = '§';

/// One colour or format selectable inside line text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatCode {
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

impl FormatCode {
    /// Every code, colours first, in code-character order
    pub const ALL: [FormatCode; 22] = [
        FormatCode::Black,
        FormatCode::DarkBlue,
        FormatCode::DarkGreen,
        FormatCode::DarkAqua,
        FormatCode::DarkRed,
        FormatCode::DarkPurple,
        FormatCode::Gold,
        FormatCode::Gray,
        FormatCode::DarkGray,
        FormatCode::Blue,
        FormatCode::Green,
        FormatCode::Aqua,
        FormatCode::Red,
        FormatCode::LightPurple,
        FormatCode::Yellow,
        FormatCode::White,
        FormatCode::Obfuscated,
        FormatCode::Bold,
        FormatCode::Strikethrough,
        FormatCode::Underline,
        FormatCode::Italic,
        FormatCode::Reset,
    ];

    pub fn code(self) -> char {
        match self {
            FormatCode::Black => '0',
            FormatCode::DarkBlue => '1',
            FormatCode::DarkGreen => '2',
            FormatCode::DarkAqua => '3',
            FormatCode::DarkRed => '4',
            FormatCode::DarkPurple => '5',
            FormatCode::Gold => '6',
            FormatCode::Gray => '7',
            FormatCode::DarkGray => '8',
            FormatCode::Blue => '9',
            FormatCode::Green => 'a',
            FormatCode::Aqua => 'b',
            FormatCode::Red => 'c',
            FormatCode::LightPurple => 'd',
            FormatCode::Yellow => 'e',
            FormatCode::White => 'f',
            FormatCode::Obfuscated => 'k',
            FormatCode::Bold => 'l',
            FormatCode::Strikethrough => 'm',
            FormatCode::Underline => 'n',
            FormatCode::Italic => 'o',
            FormatCode::Reset => 'r',
        }
    }

    /// Case-insensitive lookup of a code character
    pub fn from_code(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        Self::ALL.into_iter().find(|fc| fc.code() == c)
    }

    pub fn is_color(self) -> bool {
        self.color().is_some()
    }

    /// Terminal colour for colour codes, `None` for format codes
    pub fn color(self) -> Option<Color> {
        let color = match self {
            FormatCode::Black => Color::Black,
            FormatCode::DarkBlue => Color::Blue,
            FormatCode::DarkGreen => Color::Green,
            FormatCode::DarkAqua => Color::Cyan,
            FormatCode::DarkRed => Color::Red,
            FormatCode::DarkPurple => Color::Magenta,
            FormatCode::Gold => Color::Yellow,
            FormatCode::Gray => Color::Gray,
            FormatCode::DarkGray => Color::DarkGray,
            FormatCode::Blue => Color::LightBlue,
            FormatCode::Green => Color::LightGreen,
            FormatCode::Aqua => Color::LightCyan,
            FormatCode::Red => Color::LightRed,
            FormatCode::LightPurple => Color::LightMagenta,
            FormatCode::Yellow => Color::LightYellow,
            FormatCode::White => Color::White,
            _ => return None,
        };
        Some(color)
    }

    /// Apply this code on top of the running style.
    /// Colours and reset start from a clean style, formats stack.
    pub fn apply(self, style: Style) -> Style {
        if let Some(color) = self.color() {
            return Style::default().fg(color);
        }
        match self {
            FormatCode::Obfuscated => style.add_modifier(Modifier::RAPID_BLINK),
            FormatCode::Bold => style.add_modifier(Modifier::BOLD),
            FormatCode::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
            FormatCode::Underline => style.add_modifier(Modifier::UNDERLINED),
            FormatCode::Italic => style.add_modifier(Modifier::ITALIC),
            _ => Style::default(),
        }
    }
}

impl fmt::Display for FormatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SECTION, self.code())
    }
}

/// Split `text` into styled spans, consuming every valid code.
/// A `§` followed by an unknown character (or nothing) is kept as text.
pub fn styled_line(text: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == SECTION {
            if let Some(code) = chars.peek().copied().and_then(FormatCode::from_code) {
                chars.next();
                if !current.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current), style));
                }
                style = code.apply(style);
                continue;
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, style));
    }
    Line::from(spans)
}

/// Remove every valid code, leaving the visible text
pub fn strip_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == SECTION && chars.peek().copied().and_then(FormatCode::from_code).is_some() {
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_round_trip() {
        for fc in FormatCode::ALL {
            assert_eq!(FormatCode::from_code(fc.code()), Some(fc));
        }
        assert_eq!(FormatCode::from_code('A'), Some(FormatCode::Green));
        assert_eq!(FormatCode::from_code('z'), None);
    }

    #[test]
    fn display_writes_section_sign() {
        assert_eq!(FormatCode::Green.to_string(), "§a");
        assert_eq!(format!("{}{}", FormatCode::Reset, FormatCode::Black), "§r§0");
    }

    #[test]
    fn strip_keeps_unknown_codes() {
        assert_eq!(strip_codes("§aKills: §l3"), "Kills: 3");
        assert_eq!(strip_codes("§r§0"), "");
        assert_eq!(strip_codes("50§ off§"), "50§ off§");
    }

    #[test]
    fn styled_line_splits_on_codes() {
        let line = styled_line("§cRed§lBold§rPlain");
        let parts: Vec<(&str, Style)> = line
            .spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style))
            .collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], ("Red", Style::default().fg(Color::LightRed)));
        assert_eq!(
            parts[1],
            ("Bold", Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD))
        );
        assert_eq!(parts[2], ("Plain", Style::default()));
    }

    #[test]
    fn blank_placeholder_renders_no_text() {
        let line = styled_line("§r§5");
        assert!(line.spans.is_empty());
    }
}
