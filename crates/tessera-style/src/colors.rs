//! Symbolic color roles and the palette that maps them to cell styles.

use std::collections::HashMap;

use tessera_render::{CellStyle, Color};

/// What a piece of the screen is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Ordinary widget background and text.
    Normal,
    /// The focused item.
    Highlight,
    /// Insensitive items.
    Disabled,
    /// A focused but insensitive item.
    HighlightDisabled,
    /// Title bar of the focused window.
    Title,
    /// Title bar of unfocused windows.
    TitleDim,
    /// Drop shadows.
    Shadow,
    /// Title bar of a window asking for attention.
    Urgent,
    /// Plain text content.
    Text,
}

impl ColorRole {
    pub const ALL: [ColorRole; 9] = [
        ColorRole::Normal,
        ColorRole::Highlight,
        ColorRole::Disabled,
        ColorRole::HighlightDisabled,
        ColorRole::Title,
        ColorRole::TitleDim,
        ColorRole::Shadow,
        ColorRole::Urgent,
        ColorRole::Text,
    ];

    /// The key used for this role in the `[colors]` section.
    pub fn name(self) -> &'static str {
        match self {
            ColorRole::Normal => "normal",
            ColorRole::Highlight => "highlight",
            ColorRole::Disabled => "disabled",
            ColorRole::HighlightDisabled => "highlight-disabled",
            ColorRole::Title => "title",
            ColorRole::TitleDim => "title-dim",
            ColorRole::Shadow => "shadow",
            ColorRole::Urgent => "urgent",
            ColorRole::Text => "text",
        }
    }

    /// Look a role up by its `[colors]` key.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(name))
    }

    fn default_pair(self) -> ColorPair {
        use Color::*;
        match self {
            ColorRole::Normal => ColorPair::new(White, Black),
            ColorRole::Highlight => ColorPair::new(White, Blue),
            ColorRole::Disabled => ColorPair::new(Yellow, Black),
            ColorRole::HighlightDisabled => ColorPair::new(Cyan, Blue),
            ColorRole::Title => ColorPair::new(White, Blue),
            ColorRole::TitleDim => ColorPair::new(White, Black),
            ColorRole::Shadow => ColorPair::new(Black, Black),
            ColorRole::Urgent => ColorPair::new(Green, Black),
            ColorRole::Text => ColorPair::new(White, Black),
        }
    }

    /// How the role is shown when colors are turned off.
    fn monochrome(self) -> CellStyle {
        let plain = CellStyle::default();
        match self {
            ColorRole::Highlight | ColorRole::HighlightDisabled | ColorRole::Title => plain.reversed(),
            ColorRole::Urgent => plain.bold(),
            _ => plain,
        }
    }
}

/// A foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColorPair {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    /// Parse `"fg; bg"` (a comma also separates).
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split([';', ',']).map(str::trim).filter(|p| !p.is_empty());
        let fg = Color::from_name(parts.next()?)?;
        let bg = Color::from_name(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { fg, bg })
    }
}

/// Role → color mapping, with built-in defaults for every role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    overrides: HashMap<ColorRole, ColorPair>,
}

impl Palette {
    /// Override the pair used for `role`.
    pub fn set(&mut self, role: ColorRole, pair: ColorPair) {
        self.overrides.insert(role, pair);
    }

    /// The pair configured for `role`.
    pub fn pair(&self, role: ColorRole) -> ColorPair {
        self.overrides
            .get(&role)
            .copied()
            .unwrap_or_else(|| role.default_pair())
    }

    /// The cell style for `role`; monochrome when `color` is false.
    pub fn style(&self, role: ColorRole, color: bool) -> CellStyle {
        if !color {
            return role.monochrome();
        }
        let pair = self.pair(role);
        CellStyle::new(pair.fg, pair.bg)
    }
}
