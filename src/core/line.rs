//! Line text helpers: fixed-width padding and blank-row placeholders
use crate::core::style::FormatCode;

/// Which side of the text keeps its edge when padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Text first, spaces appended on the right
    #[default]
    Left,
    /// Spaces first, text flush with the right edge
    Right,
}

impl Align {
    pub fn from_left(left_align: bool) -> Self {
        if left_align {
            Align::Left
        } else {
            Align::Right
        }
    }
}

/// Cut or pad `text` to exactly `total_len` characters.
///
/// Long text is truncated without an ellipsis. Formatting codes count towards
/// the length like any other character.
pub fn fit_line(text: &str, total_len: usize, align: Align) -> String {
    let len = text.chars().count();
    if len >= total_len {
        return text.chars().take(total_len).collect();
    }

    let padding = " ".repeat(total_len - len);
    match align {
        Align::Left => format!("{text}{padding}"),
        Align::Right => format!("{padding}{text}"),
    }
}

/// Bounded set of codes used to keep blank rows textually distinct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankPalette {
    size: usize,
}

impl BlankPalette {
    pub const MAX: usize = FormatCode::ALL.len();

    /// Palette of the first `size` codes, clamped to `1..=MAX`.
    ///
    /// Placeholders repeat every `size` lines, so a board with more than
    /// `size` entries can give two blank lines the same text, and the sink
    /// then shows them as one row. Keep `size` at or above the number of
    /// lines a board is expected to hold.
    pub fn new(size: usize) -> Self {
        Self { size: size.clamp(1, Self::MAX) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Placeholder for a board that currently holds `entries` lines.
    /// Renders as nothing but differs from its neighbours by the trailing code.
    pub fn placeholder(&self, entries: usize) -> String {
        let variant = FormatCode::ALL[entries % self.size];
        format!("{}{}", FormatCode::Reset, variant)
    }
}

impl Default for BlankPalette {
    fn default() -> Self {
        Self::new(Self::MAX)
    }
}

/// Key for blank line number `counter`
pub fn blank_key(prefix: &str, counter: usize) -> String {
    format!("{prefix}{counter}")
}
