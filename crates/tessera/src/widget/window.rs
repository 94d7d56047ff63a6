//! Top-level windows.

use tessera_core::MouseEvent;
use tessera_render::Size;

use super::box_widget::BoxWidget;
use super::flags::WidgetFlags;
use super::traits::Widget;
use super::tree::WidgetTree;
use super::WidgetId;

/// A window: a bordered vertical box with a title.
///
/// A window's menu is kept by the tree (see [`WidgetTree::set_window_menu`])
/// so that actions can reach it while the window handles a key.
#[derive(Debug, Clone)]
pub struct Window {
    inner: BoxWidget,
}

impl Window {
    pub fn new(title: &str) -> Self {
        let mut inner = BoxWidget::new(true, false);
        inner.set_title(Some(title));
        Self { inner }
    }
}

impl Widget for Window {
    fn default_flags(&self) -> WidgetFlags {
        WidgetFlags::CAN_TAKE_FOCUS | WidgetFlags::DISABLE_ACTIONS
    }

    fn as_box(&self) -> Option<&BoxWidget> {
        Some(&self.inner)
    }

    fn as_box_mut(&mut self) -> Option<&mut BoxWidget> {
        Some(&mut self.inner)
    }

    fn measure(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.inner.measure(tree, id);
    }

    fn map(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.inner.map(tree, id);
    }

    fn place(&mut self, tree: &mut WidgetTree, id: WidgetId, x: i32, y: i32) {
        self.inner.place(tree, id, x, y);
    }

    fn confirm_size(&mut self, tree: &mut WidgetTree, id: WidgetId, width: i32, height: i32) -> bool {
        self.inner.confirm_size(tree, id, width, height)
    }

    fn size_changed(&mut self, tree: &mut WidgetTree, id: WidgetId, old: Size) {
        self.inner.size_changed(tree, id, old);
    }

    fn draw(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.inner.draw(tree, id);
    }

    fn key_pressed(&mut self, tree: &mut WidgetTree, id: WidgetId, key: &[u8]) -> bool {
        self.inner.key_pressed(tree, id, key)
    }

    fn clicked(&mut self, tree: &mut WidgetTree, id: WidgetId, event: MouseEvent, x: i32, y: i32) -> bool {
        self.inner.clicked(tree, id, event, x, y)
    }

    fn gained_focus(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.inner.gained_focus(tree, id);
    }

    fn lost_focus(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.inner.lost_focus(tree, id);
    }

    fn destroy(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        if let Some(menu) = tree.menus.remove(id) {
            tree.destroy(menu);
        }
    }
}
