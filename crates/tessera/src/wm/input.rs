//! Keyboard and mouse dispatch.
//!
//! Every decoded key goes through [`WindowManager::dispatch_key`]:
//!
//! 1. `WaitOnChild` drops it.
//! 2. Resize and move modes consume it (arrows adjust, enter confirms,
//!    escape cancels).
//! 3. An active popup menu receives it exclusively.
//! 4. The WM kind's bindings are tried, unless keys are being ignored.
//! 5. The focused window gets it.
//!
//! Requests queued by widgets along the way are processed before returning.

use tessera_core::logging::{span_names, targets};
use tessera_core::MouseEvent;
use tessera_render::{Point, Rect, Size};

use super::manager::{PopupMenu, WindowManager};
use super::mode::InputMode;
use crate::widget::WidgetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeKey {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Cancel,
    Other,
}

impl WindowManager {
    /// Feed raw terminal bytes.
    ///
    /// Complete keys are dispatched immediately. A tail that may still grow
    /// into a longer sequence is held back; the caller arms the escape-delay
    /// timer while [`has_pending_input`](Self::has_pending_input) is true and
    /// calls [`flush_input`](Self::flush_input) when it fires.
    pub fn process_input(&mut self, bytes: &[u8]) {
        let keys = {
            let bound = self.toolkit.recognizer().read();
            let names = self.toolkit.names();
            self.decoder.feed(bytes, &bound, names.sequences())
        };
        self.dispatch_all(keys);
    }

    /// Resolve a held-back tail, typically a lone escape.
    pub fn flush_input(&mut self) {
        let keys = {
            let bound = self.toolkit.recognizer().read();
            let names = self.toolkit.names();
            self.decoder.flush(&bound, names.sequences())
        };
        self.dispatch_all(keys);
    }

    pub fn has_pending_input(&self) -> bool {
        self.decoder.has_pending()
    }

    fn dispatch_all(&mut self, keys: Vec<Vec<u8>>) {
        for key in keys {
            self.dispatch_key(&key);
        }
    }

    /// Route one decoded key. Returns whether anything handled it.
    ///
    /// The key counts as user input: windows created while it is handled
    /// take focus.
    pub fn dispatch_key(&mut self, key: &[u8]) -> bool {
        let _span = tracing::trace_span!(target: targets::WM, span_names::DISPATCH, key = %key.escape_ascii()).entered();

        let outer = std::mem::replace(&mut self.event_stack, true);
        let handled = match self.mode {
            InputMode::WaitOnChild { pid } => {
                tracing::trace!(target: targets::WM, pid, "input dropped while waiting on child");
                false
            }
            InputMode::Resize { .. } | InputMode::Move { .. } => self.mode_key(key),
            InputMode::Normal => self.normal_key(key),
        };
        self.process_requests();
        self.event_stack = outer;
        handled
    }

    fn normal_key(&mut self, key: &[u8]) -> bool {
        if let Some(menu) = self.menu {
            if !self.tree.key_pressed(menu.menu, key) && self.classify_mode_key(key) == ModeKey::Cancel {
                self.dismiss_menu();
            }
            return true;
        }

        if self.ignore_keys {
            if self.kinds.bound_action(self.kind, key).as_deref() == Some("ignore-keys-end") {
                return self.perform_wm_key(key);
            }
        } else if self.perform_wm_key(key) {
            return true;
        }

        match self.focused_window() {
            Some(window) => self.tree.key_pressed(window, key),
            None => false,
        }
    }

    fn classify_mode_key(&self, key: &[u8]) -> ModeKey {
        let names = self.toolkit.names();
        let is = |name: &str| names.sequence(name) == Some(key);
        if is("left") {
            ModeKey::Left
        } else if is("right") {
            ModeKey::Right
        } else if is("up") {
            ModeKey::Up
        } else if is("down") {
            ModeKey::Down
        } else if is("enter") {
            ModeKey::Confirm
        } else if is("escape") {
            ModeKey::Cancel
        } else {
            ModeKey::Other
        }
    }

    // =========================================================================
    // Resize and move
    // =========================================================================

    /// Enter RESIZE mode on the focused window.
    pub fn start_resize(&mut self) -> bool {
        let Some(window) = self.focused_window() else {
            return false;
        };
        let Some(pending) = self.tree.base(window).map(|base| base.size()) else {
            return false;
        };
        self.set_mode(InputMode::Resize { window, pending });
        true
    }

    /// Enter MOVE mode on the focused window.
    pub fn start_move(&mut self) -> bool {
        let Some(window) = self.focused_window() else {
            return false;
        };
        let Some(pending) = self.tree.base(window).map(|base| base.position()) else {
            return false;
        };
        self.set_mode(InputMode::Move { window, pending });
        true
    }

    fn mode_key(&mut self, key: &[u8]) -> bool {
        let key = self.classify_mode_key(key);
        match key {
            ModeKey::Confirm => self.confirm_mode(),
            ModeKey::Cancel => self.cancel_mode(),
            ModeKey::Other => {}
            arrow => self.adjust_pending(arrow),
        }
        true
    }

    fn adjust_pending(&mut self, key: ModeKey) {
        let (dx, dy) = match key {
            ModeKey::Left => (-1, 0),
            ModeKey::Right => (1, 0),
            ModeKey::Up => (0, -1),
            ModeKey::Down => (0, 1),
            _ => return,
        };
        match self.mode {
            InputMode::Resize { window, pending } => {
                let Some(base) = self.tree.base(window) else {
                    return;
                };
                let (origin, min) = (base.position(), base.min_size());
                // The minimum wins when it does not fit before the screen edge.
                let fit = |value: i32, min: i32, room: i32| {
                    let min = min.max(1);
                    value.min(room.max(min)).max(min)
                };
                let pending = Size::new(
                    fit(pending.width + dx, min.width, self.screen.width - origin.x),
                    fit(pending.height + dy, min.height, self.screen.height - origin.y),
                );
                self.mode = InputMode::Resize { window, pending };
            }
            InputMode::Move { window, pending } => {
                let Some(size) = self.tree.base(window).map(|base| base.size()) else {
                    return;
                };
                let pending = self.clamp_origin(Point::new(pending.x + dx, pending.y + dy), size);
                self.mode = InputMode::Move { window, pending };
            }
            InputMode::Normal | InputMode::WaitOnChild { .. } => {}
        }
    }

    /// Apply the pending geometry and return to NORMAL.
    ///
    /// A resize goes through the window's size negotiation, so either a
    /// `confirm_resize` slot or the widgets themselves can refuse it; a
    /// refused geometry leaves the window unchanged.
    pub fn confirm_mode(&mut self) {
        let mode = self.mode;
        self.set_mode(InputMode::Normal);
        match mode {
            InputMode::Resize { window, pending } => {
                if !self.signals().confirm_resize.emit(&(window, pending)) {
                    tracing::debug!(target: targets::WM, ?window, "resize vetoed");
                    return;
                }
                if !self.tree.set_size(window, pending.width, pending.height) {
                    tracing::debug!(target: targets::WM, ?window, "resize refused by widget");
                    return;
                }
                let size = self.tree.base(window).map(|base| base.size()).unwrap_or(pending);
                tracing::debug!(target: targets::WM, ?window, width = size.width, height = size.height, "window resized");
                self.signals().window_resized.emit((window, size));
            }
            InputMode::Move { window, pending } => {
                if !self.signals().confirm_move.emit(&(window, pending)) {
                    tracing::debug!(target: targets::WM, ?window, "move vetoed");
                    return;
                }
                self.tree.place(window, pending.x, pending.y);
                tracing::debug!(target: targets::WM, ?window, x = pending.x, y = pending.y, "window moved");
                self.signals().window_moved.emit((window, pending));
            }
            InputMode::Normal | InputMode::WaitOnChild { .. } => {}
        }
    }

    /// Abandon the pending geometry without touching the window.
    pub fn cancel_mode(&mut self) {
        if self.mode.window().is_some() {
            self.set_mode(InputMode::Normal);
        }
    }

    /// The outline of a pending resize or move, in screen coordinates.
    pub fn pending_geometry(&self) -> Option<Rect> {
        match self.mode {
            InputMode::Resize { window, pending } => {
                let origin = self.tree.base(window)?.position();
                Some(Rect::from_parts(origin, pending))
            }
            InputMode::Move { window, pending } => {
                let size = self.tree.base(window)?.size();
                Some(Rect::from_parts(pending, size))
            }
            InputMode::Normal | InputMode::WaitOnChild { .. } => None,
        }
    }

    // =========================================================================
    // Menus
    // =========================================================================

    /// Pop up `menu` next to `owner`; it receives all keys until dismissed.
    pub fn show_menu(&mut self, owner: WidgetId, menu: WidgetId) {
        if !self.tree.contains(menu) {
            return;
        }
        self.dismiss_menu();
        self.tree.map(menu);
        let anchor = self
            .tree
            .base(owner)
            .map(|base| base.position().offset(1, 1))
            .unwrap_or(Point::ZERO);
        let size = self.tree.base(menu).map(|base| base.size()).unwrap_or(Size::ZERO);
        let origin = self.clamp_origin(anchor, size);
        self.tree.place(menu, origin.x, origin.y);
        self.tree.set_focus(menu, true);
        self.tree.draw(menu);
        self.menu = Some(PopupMenu { owner, menu });
        tracing::debug!(target: targets::WM, ?owner, ?menu, "menu shown");
    }

    /// Close the active popup menu. The menu widget is kept.
    pub fn dismiss_menu(&mut self) -> bool {
        let Some(menu) = self.menu.take() else {
            return false;
        };
        self.tree.set_focus(menu.menu, false);
        tracing::debug!(target: targets::WM, menu = ?menu.menu, "menu dismissed");
        true
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// The topmost window of the current workspace under a screen point.
    pub fn window_at(&self, x: i32, y: i32) -> Option<WidgetId> {
        let point = Point::new(x, y);
        self.stacking_order()
            .into_iter()
            .rev()
            .find(|&window| self.visible_area(window).is_some_and(|area| area.contains(point)))
    }

    /// Deliver a mouse event.
    ///
    /// A press outside an active menu dismisses it. A press on a window
    /// other than the focused one focuses that window first. The event is
    /// then forwarded to the window in content coordinates.
    pub fn process_click(&mut self, event: MouseEvent, x: i32, y: i32) -> bool {
        if !self.mode.is_normal() {
            return false;
        }
        let outer = std::mem::replace(&mut self.event_stack, true);
        let handled = self.route_click(event, x, y);
        self.event_stack = outer;
        self.process_requests();
        handled
    }

    fn route_click(&mut self, event: MouseEvent, x: i32, y: i32) -> bool {
        if let Some(menu) = self.menu {
            let inside = self
                .tree
                .base(menu.menu)
                .is_some_and(|base| base.geometry().contains(Point::new(x, y)));
            if inside {
                return self.tree.clicked(menu.menu, event, x, y);
            }
            if event.is_press() {
                self.dismiss_menu();
            }
            return true;
        }

        let Some(window) = self.window_at(x, y) else {
            return false;
        };
        if event.is_press() && self.focused_window() != Some(window) {
            self.give_focus(window);
        }
        let scroll = self.node(window).map_or(0, |node| node.scroll);
        self.tree.clicked(window, event, x, y + scroll)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tessera_render::Size;

    use super::*;
    use crate::toolkit::Toolkit;

    fn manager_with_window() -> (WindowManager, WidgetId) {
        let mut wm = WindowManager::new(Toolkit::default(), Size::new(80, 24));
        let window = wm.tree_mut().new_window("Main");
        let label = wm.tree_mut().new_label("content");
        wm.tree_mut().add_widget(window, label).unwrap();
        wm.new_window(window).unwrap();
        (wm, window)
    }

    #[test]
    fn test_move_mode_confirm_and_cancel() {
        let (mut wm, window) = manager_with_window();
        let start = wm.tree().base(window).unwrap().position();

        assert!(wm.start_move());
        wm.process_input(b"\x1b[C\x1b[C\x1b[B");
        assert_eq!(
            wm.mode(),
            InputMode::Move {
                window,
                pending: start.offset(2, 1)
            }
        );
        wm.process_input(b"\x1b");
        wm.flush_input();
        assert!(wm.mode().is_normal());
        assert_eq!(wm.tree().base(window).unwrap().position(), start);

        assert!(wm.start_move());
        wm.process_input(b"\x1b[D\r");
        assert_eq!(wm.tree().base(window).unwrap().position(), start.offset(-1, 0));
    }

    #[test]
    fn test_move_veto_keeps_position() {
        let (mut wm, window) = manager_with_window();
        let start = wm.tree().base(window).unwrap().position();
        wm.signals().confirm_move.connect(|_| false);
        wm.start_move();
        wm.process_input(b"\x1b[B\r");
        assert!(wm.mode().is_normal());
        assert_eq!(wm.tree().base(window).unwrap().position(), start);
    }

    #[test]
    fn test_pending_geometry_outline() {
        let (mut wm, window) = manager_with_window();
        let geometry = wm.tree().base(window).unwrap().geometry();
        assert_eq!(wm.pending_geometry(), None);
        wm.start_resize();
        wm.dispatch_key(b"\x1b[C");
        let pending = wm.pending_geometry().unwrap();
        assert_eq!(pending.origin, geometry.origin);
        assert_eq!(pending.width(), geometry.width() + 1);
    }

    #[test]
    fn test_wm_binding_runs_before_window() {
        let (mut wm, _) = manager_with_window();
        assert!(wm.dispatch_key(b"\x1bm"));
        assert!(matches!(wm.mode(), InputMode::Move { .. }));
    }

    #[test]
    fn test_ignore_keys_bypasses_wm_bindings() {
        let (mut wm, _) = manager_with_window();
        assert!(wm.dispatch_key(b"\x07"));
        assert!(wm.is_ignoring_keys());

        wm.dispatch_key(b"\x1bm");
        assert!(wm.mode().is_normal());

        assert!(wm.dispatch_key(b"\x1b\x07"));
        assert!(!wm.is_ignoring_keys());
    }

    #[test]
    fn test_wait_on_child_drops_input() {
        let (mut wm, _) = manager_with_window();
        wm.wait_on_child(7);
        assert!(!wm.dispatch_key(b"\x1bm"));
        assert_eq!(wm.mode(), InputMode::WaitOnChild { pid: 7 });
    }

    #[test]
    fn test_menu_takes_keys_exclusively() {
        let (mut wm, window) = manager_with_window();
        let menu = wm.tree_mut().new_box(true, false);
        let item = wm.tree_mut().new_label("Item");
        wm.tree_mut().add_widget(menu, item).unwrap();
        wm.tree_mut().set_window_menu(window, Some(menu));

        assert!(wm.dispatch_key(b"\x1b[21~"));
        assert_eq!(wm.active_menu(), Some(PopupMenu { owner: window, menu }));

        assert!(wm.dispatch_key(b"\x1bm"));
        assert!(wm.mode().is_normal());

        wm.dispatch_key(b"\x1b");
        assert_eq!(wm.active_menu(), None);
    }

    #[test]
    fn test_click_focuses_window_under_cursor() {
        let mut wm = WindowManager::new(Toolkit::default(), Size::new(80, 24));
        let left = wm.tree_mut().new_window("Left");
        wm.tree_mut().set_position(left, 0, 0);
        let right = wm.tree_mut().new_window("Right");
        wm.tree_mut().set_position(right, 40, 0);
        wm.new_window(left).unwrap();
        wm.new_window(right).unwrap();
        assert_eq!(wm.focused_window(), Some(left));

        assert_eq!(wm.window_at(41, 1), Some(right));
        wm.process_click(MouseEvent::LeftDown, 41, 1);
        assert_eq!(wm.focused_window(), Some(right));

        assert_eq!(wm.window_at(79, 23), None);
        assert!(!wm.process_click(MouseEvent::LeftDown, 79, 23));
    }

    #[test]
    fn test_context_menu_request_reaches_signal() {
        let (mut wm, window) = manager_with_window();
        let seen = Arc::new(AtomicBool::new(false));
        let flag = seen.clone();
        wm.signals().context_menu.connect(move |_| flag.store(true, Ordering::SeqCst));
        wm.tree_mut().perform_named(window, "context-menu", &[]);
        wm.process_requests();
        assert!(seen.load(Ordering::SeqCst));
    }
}
