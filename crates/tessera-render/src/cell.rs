//! Terminal cells and their styles.

/// The eight ANSI colors plus the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// All colors in ANSI index order, preceded by `Default`.
    pub const ALL: [Color; 9] = [
        Color::Default,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// Parse a color from its lowercase name (`"blue"`, `"default"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }

    /// The lowercase name of this color.
    pub fn name(self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
        }
    }

    /// ANSI color index, or `None` for the terminal default.
    pub fn ansi_index(self) -> Option<u8> {
        match self {
            Color::Default => None,
            other => Self::ALL
                .iter()
                .position(|c| *c == other)
                .map(|i| i as u8 - 1),
        }
    }
}

/// Foreground, background and text attributes of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl CellStyle {
    /// A style with the given colors and no attributes.
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            underline: false,
            reverse: false,
        }
    }

    /// Return a copy with bold set.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Return a copy with reverse video set.
    pub const fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// One terminal cell: a grapheme cluster and its style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub symbol: String,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(CellStyle::default())
    }
}

impl Cell {
    /// A space with the given style.
    pub fn blank(style: CellStyle) -> Self {
        Self {
            symbol: " ".to_string(),
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_names_round_trip() {
        for color in Color::ALL {
            assert_eq!(Color::from_name(color.name()), Some(color));
        }
        assert_eq!(Color::from_name(" Blue "), Some(Color::Blue));
        assert_eq!(Color::from_name("mauve"), None);
    }

    #[test]
    fn test_ansi_index() {
        assert_eq!(Color::Default.ansi_index(), None);
        assert_eq!(Color::Black.ansi_index(), Some(0));
        assert_eq!(Color::White.ansi_index(), Some(7));
    }
}
