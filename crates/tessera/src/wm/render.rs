//! Composing the screen from window surfaces.

use tessera_core::logging::targets;
use tessera_render::{Backend, CellStyle, Point, Rect, RenderResult, Surface};
use tessera_style::ColorRole;

use super::manager::WindowManager;
use crate::widget::{WidgetFlags, WidgetId};

impl WindowManager {
    /// Windows of the current workspace, bottom to top.
    pub fn stacking_order(&self) -> Vec<WidgetId> {
        let mut windows: Vec<(u64, WidgetId)> = self.workspaces[self.current]
            .windows()
            .iter()
            .filter_map(|&window| self.node(window).map(|node| (node.layer, window)))
            .collect();
        windows.sort_unstable_by_key(|&(layer, _)| layer);
        windows.into_iter().map(|(_, window)| window).collect()
    }

    /// The part of a window that is on screen, accounting for scrolling.
    pub(crate) fn visible_area(&self, window: WidgetId) -> Option<Rect> {
        let base = self.tree.base(window)?;
        if !base.is_visible() {
            return None;
        }
        let scroll = self.node(window).map_or(0, |node| node.scroll);
        let geometry = base.geometry();
        Some(Rect::new(
            geometry.left(),
            geometry.top(),
            geometry.width(),
            geometry.height() - scroll,
        ))
    }

    /// Compose the current workspace into a screen-sized surface.
    ///
    /// Windows are drawn back to front with a one-cell drop shadow when
    /// shadows are enabled; the popup menu goes on top, followed by the
    /// outline of a pending resize or move.
    pub fn render(&mut self) -> Surface {
        let mut screen = Surface::new(self.screen.width, self.screen.height);
        screen.clear(self.tree.style(ColorRole::Normal));
        let shadow = self
            .toolkit
            .config()
            .general()
            .shadow
            .then(|| self.tree.style(ColorRole::Shadow));

        for window in self.stacking_order() {
            self.tree.draw(window);
            let scroll = self.node(window).map_or(0, |node| node.scroll);
            self.compose(&mut screen, window, scroll, shadow);
        }
        if let Some(menu) = self.menu {
            self.tree.draw(menu.menu);
            self.compose(&mut screen, menu.menu, 0, shadow);
        }
        if let Some(outline) = self.pending_geometry() {
            draw_outline(&mut screen, outline, self.tree.style(ColorRole::Highlight));
        }
        tracing::trace!(target: targets::WM, windows = self.workspaces[self.current].len(), "screen composed");
        screen
    }

    fn compose(&self, screen: &mut Surface, window: WidgetId, scroll: i32, shadow: Option<CellStyle>) {
        let Some(base) = self.tree.base(window) else {
            return;
        };
        let Some(surface) = base.surface() else {
            return;
        };
        if !base.is_visible() {
            return;
        }
        let size = base.size();
        let origin = base.position();
        let visible = Rect::new(0, scroll, size.width, size.height - scroll);
        if visible.is_empty() {
            return;
        }
        screen.copy_from(surface, visible, origin);

        if let Some(style) = shadow
            && !base.has_flag(WidgetFlags::NO_SHADOW)
        {
            let area = Rect::from_parts(origin, visible.size);
            screen.fill(Rect::new(area.right(), area.top() + 1, 1, area.height()), " ", style);
            screen.fill(Rect::new(area.left() + 1, area.bottom(), area.width(), 1), " ", style);
        }
    }

    /// Render and push the frame to a backend.
    pub fn present<B: Backend>(&mut self, backend: &mut B) -> RenderResult<()> {
        let frame = self.render();
        backend.present(&frame)
    }
}

fn draw_outline(screen: &mut Surface, rect: Rect, style: CellStyle) {
    if rect.is_empty() {
        return;
    }
    let (left, top) = (rect.left(), rect.top());
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
    screen.fill(Rect::new(left, top, rect.width(), 1), "-", style);
    screen.fill(Rect::new(left, bottom, rect.width(), 1), "-", style);
    screen.fill(Rect::new(left, top, 1, rect.height()), "|", style);
    screen.fill(Rect::new(right, top, 1, rect.height()), "|", style);
    for corner in [
        Point::new(left, top),
        Point::new(right, top),
        Point::new(left, bottom),
        Point::new(right, bottom),
    ] {
        screen.put_char(corner.x, corner.y, "+", style);
    }
}

#[cfg(test)]
mod tests {
    use tessera_render::{MemoryBackend, Size};
    use tessera_style::StyleConfig;

    use super::*;
    use crate::toolkit::Toolkit;

    fn no_shadow() -> Toolkit {
        Toolkit::init(StyleConfig::from_str("[general]\nshadow = false\n").unwrap())
    }

    #[test]
    fn test_render_places_window_content() {
        let mut wm = WindowManager::new(no_shadow(), Size::new(20, 6));
        let window = wm.tree_mut().new_window("T");
        let label = wm.tree_mut().new_label("hi");
        wm.tree_mut().add_widget(window, label).unwrap();
        wm.tree_mut().set_position(window, 2, 1);
        wm.new_window(window).unwrap();

        let screen = wm.render();
        assert_eq!(screen.size(), Size::new(20, 6));
        assert!(screen.row_text(2).contains("hi"));
        assert_eq!(screen.cell(2, 1).unwrap().symbol, "┌");
    }

    #[test]
    fn test_focused_window_is_drawn_on_top() {
        let mut wm = WindowManager::new(no_shadow(), Size::new(20, 6));
        let windows = ["aaaa", "bbbb"].map(|text| {
            let window = wm.tree_mut().new_window("");
            let label = wm.tree_mut().new_label(text);
            wm.tree_mut().add_widget(window, label).unwrap();
            wm.tree_mut().set_position(window, 0, 0);
            wm.new_window(window).unwrap();
            window
        });

        wm.give_focus(windows[0]);
        assert!(wm.render().row_text(1).contains("aaaa"));
        wm.give_focus(windows[1]);
        assert!(wm.render().row_text(1).contains("bbbb"));
    }

    #[test]
    fn test_shadow_is_drawn_when_enabled() {
        let config = StyleConfig::from_str("[general]\nshadow = true\n").unwrap();
        let mut wm = WindowManager::new(Toolkit::init(config), Size::new(20, 8));
        let window = wm.tree_mut().new_window("");
        wm.tree_mut().set_position(window, 0, 0);
        wm.new_window(window).unwrap();

        let size = wm.tree().base(window).unwrap().size();
        let shadow_style = wm.tree().style(ColorRole::Shadow);
        let screen = wm.render();
        assert_eq!(screen.cell(size.width, 1).unwrap().style, shadow_style);
        assert_eq!(screen.cell(1, size.height).unwrap().style, shadow_style);
    }

    #[test]
    fn test_present_pushes_a_frame() {
        let mut wm = WindowManager::new(no_shadow(), Size::new(10, 4));
        let mut backend = MemoryBackend::new(Size::new(10, 4));
        wm.present(&mut backend).unwrap();
        assert_eq!(backend.frame_count(), 1);
        assert_eq!(backend.last_frame().unwrap().size(), Size::new(10, 4));
    }

    #[test]
    fn test_resize_outline_is_drawn() {
        let mut wm = WindowManager::new(no_shadow(), Size::new(30, 10));
        let window = wm.tree_mut().new_window("");
        wm.tree_mut().set_position(window, 0, 0);
        wm.new_window(window).unwrap();
        wm.start_resize();
        wm.dispatch_key(b"\x1b[C");
        wm.dispatch_key(b"\x1b[C");

        let width = wm.tree().base(window).unwrap().size().width;
        let screen = wm.render();
        assert_eq!(screen.cell(width + 1, 0).unwrap().symbol, "+");
    }
}
