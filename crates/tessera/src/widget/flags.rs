//! Widget capability and state flags.

use std::ops::{BitOr, BitOrAssign};

/// Capability and state bits carried by every widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WidgetFlags(u16);

impl WidgetFlags {
    /// No flags.
    pub const NONE: WidgetFlags = WidgetFlags(0);

    /// The widget can receive keyboard focus.
    pub const CAN_TAKE_FOCUS: WidgetFlags = WidgetFlags(1 << 0);

    /// The widget is drawn without a border.
    pub const NO_BORDER: WidgetFlags = WidgetFlags(1 << 1);

    /// The widget casts no shadow when it is a top-level window.
    pub const NO_SHADOW: WidgetFlags = WidgetFlags(1 << 2);

    /// The widget is hidden and skipped by layout and focus.
    pub const INVISIBLE: WidgetFlags = WidgetFlags(1 << 3);

    /// The widget has a drawing surface.
    pub const MAPPED: WidgetFlags = WidgetFlags(1 << 4);

    /// Key bindings are not consulted; keys go straight to the raw hook.
    pub const DISABLE_ACTIONS: WidgetFlags = WidgetFlags(1 << 5);

    /// The widget accepts width changes.
    pub const GROW_X: WidgetFlags = WidgetFlags(1 << 6);

    /// The widget accepts height changes.
    pub const GROW_Y: WidgetFlags = WidgetFlags(1 << 7);

    /// The window wants attention.
    pub const URGENT: WidgetFlags = WidgetFlags(1 << 8);

    /// The widget currently has focus.
    pub const HAS_FOCUS: WidgetFlags = WidgetFlags(1 << 9);

    /// The widget is being torn down.
    pub const DESTROYING: WidgetFlags = WidgetFlags(1 << 10);

    /// Check if every bit of `flag` is set.
    pub fn has(&self, flag: WidgetFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }

    pub fn insert(&mut self, flag: WidgetFlags) {
        self.0 |= flag.0;
    }

    pub fn remove(&mut self, flag: WidgetFlags) {
        self.0 &= !flag.0;
    }

    /// Set or clear `flag`.
    pub fn set(&mut self, flag: WidgetFlags, on: bool) {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }
}

impl BitOr for WidgetFlags {
    type Output = WidgetFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        WidgetFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WidgetFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_set_and_clear() {
        let mut flags = WidgetFlags::CAN_TAKE_FOCUS | WidgetFlags::GROW_X;
        assert!(flags.has(WidgetFlags::CAN_TAKE_FOCUS));
        assert!(!flags.has(WidgetFlags::CAN_TAKE_FOCUS | WidgetFlags::GROW_Y));

        flags.set(WidgetFlags::GROW_Y, true);
        flags.remove(WidgetFlags::CAN_TAKE_FOCUS);
        assert!(flags.has(WidgetFlags::GROW_X | WidgetFlags::GROW_Y));
        assert!(!flags.has(WidgetFlags::CAN_TAKE_FOCUS));
        assert!(WidgetFlags::NONE.has(WidgetFlags::NONE));
    }
}
