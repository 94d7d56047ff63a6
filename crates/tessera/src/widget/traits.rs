//! The widget hook table.
//!
//! A widget kind implements [`Widget`] and overrides the hooks it cares
//! about. Hooks receive the widget tree and the widget's own id, so they can
//! read and change shared state ([`WidgetBase`](super::WidgetBase)) and
//! recurse into children. While a hook runs the widget value is detached
//! from the tree; calling hooks on the same widget from inside one of its
//! own hooks is a no-op.

use std::any::Any;

use tessera_core::MouseEvent;
use tessera_render::Size;

use super::box_widget::BoxWidget;
use super::flags::WidgetFlags;
use super::tree::WidgetTree;
use super::WidgetId;

/// Downcasting support for widget values.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-kind widget behavior.
pub trait Widget: AsAny {
    /// Flags a new instance starts with.
    fn default_flags(&self) -> WidgetFlags {
        WidgetFlags::NONE
    }

    /// Box-like widgets expose their container state here.
    fn as_box(&self) -> Option<&BoxWidget> {
        None
    }

    fn as_box_mut(&mut self) -> Option<&mut BoxWidget> {
        None
    }

    /// Compute the natural size and record it with
    /// [`WidgetTree::force_size`].
    fn measure(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// Called once the widget has a surface.
    fn map(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// Move the widget to an absolute position.
    fn place(&mut self, tree: &mut WidgetTree, id: WidgetId, x: i32, y: i32) {
        tree.set_position(id, x, y);
    }

    /// Whether the widget agrees to become `width` × `height`.
    fn confirm_size(&mut self, tree: &mut WidgetTree, id: WidgetId, width: i32, height: i32) -> bool {
        tree.default_confirm_size(id, width, height)
    }

    /// The size was committed; `old` is the previous size.
    fn size_changed(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _old: Size) {}

    /// Render into the widget's surface.
    fn draw(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// Raw key handling, after bindings (if enabled) did not claim the key.
    fn key_pressed(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _key: &[u8]) -> bool {
        false
    }

    /// A mouse event at absolute screen coordinates.
    fn clicked(&mut self, _tree: &mut WidgetTree, _id: WidgetId, _event: MouseEvent, _x: i32, _y: i32) -> bool {
        false
    }

    fn gained_focus(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    fn lost_focus(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// Release resources before the widget leaves the tree.
    fn destroy(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}
}
