//! The window manager's modal input state.

use std::fmt;

use tessera_render::{Point, Size};

use crate::widget::WidgetId;

/// What the next key means.
///
/// Consulted at the top of every dispatch: the interactive modes swallow
/// the keyboard until confirmed or cancelled, and `WaitOnChild` drops input
/// until the foreground child exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Arrow keys grow or shrink `pending`; enter applies it.
    Resize { window: WidgetId, pending: Size },
    /// Arrow keys move `pending`; enter applies it.
    Move { window: WidgetId, pending: Point },
    /// A foreground child process owns the terminal.
    WaitOnChild { pid: u32 },
}

impl InputMode {
    pub fn is_normal(&self) -> bool {
        matches!(self, InputMode::Normal)
    }

    /// The window an interactive mode operates on.
    pub fn window(&self) -> Option<WidgetId> {
        match *self {
            InputMode::Resize { window, .. } | InputMode::Move { window, .. } => Some(window),
            InputMode::Normal | InputMode::WaitOnChild { .. } => None,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Normal => f.write_str("normal"),
            InputMode::Resize { .. } => f.write_str("resize"),
            InputMode::Move { .. } => f.write_str("move"),
            InputMode::WaitOnChild { .. } => f.write_str("wait-on-child"),
        }
    }
}
