//! Window bookkeeping: nodes, workspaces, focus and geometry.

use slotmap::{SecondaryMap, SlotMap};
use tessera_core::logging::targets;
use tessera_core::{Result, Signal, TesseraError, VetoSignal};
use tessera_render::{Point, Size};

use super::actions;
use super::mode::InputMode;
use super::node::{Node, NodeId};
use super::workspace::{Workspace, WorkspaceId};
use crate::binding::{ActionCallback, ActionHost, ActionParam, BindingHelpRow, KindId, KindRegistry};
use crate::key::KeyDecoder;
use crate::toolkit::Toolkit;
use crate::widget::{BoxWidget, TreeRequest, WidgetFlags, WidgetId, WidgetTree};

/// Signals emitted by the [`WindowManager`].
///
/// Plain signals report what happened. The `confirm_*` veto signals run
/// before the change; any slot returning `false` cancels it.
#[derive(Debug, Default)]
pub struct WmSignals {
    /// A window was taken under management.
    pub window_created: Signal<WidgetId>,
    /// A window left management (closed or destroyed).
    pub window_closed: Signal<WidgetId>,
    /// A window became the focused window.
    pub focus_changed: Signal<WidgetId>,
    /// A resize was applied. Args: (window, new size)
    pub window_resized: Signal<(WidgetId, Size)>,
    /// A move was applied. Args: (window, new position)
    pub window_moved: Signal<(WidgetId, Point)>,
    /// The current workspace changed. Args: workspace index
    pub workspace_switched: Signal<usize>,
    /// The input mode changed.
    pub mode_changed: Signal<InputMode>,
    /// A widget asked for a context menu.
    pub context_menu: Signal<WidgetId>,

    /// Runs before a window is closed.
    pub confirm_close: VetoSignal<WidgetId>,
    /// Runs before a pending resize is applied.
    pub confirm_resize: VetoSignal<(WidgetId, Size)>,
    /// Runs before a pending move is applied.
    pub confirm_move: VetoSignal<(WidgetId, Point)>,
}

/// A popup menu currently owning the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupMenu {
    pub owner: WidgetId,
    pub menu: WidgetId,
}

/// Manages top-level windows on a terminal screen.
///
/// Owns the [`WidgetTree`], the workspaces and one [`Node`] per managed
/// window. Input enters through [`process_input`](Self::process_input) and
/// [`process_click`](Self::process_click); the result is composed by
/// [`render`](Self::render).
pub struct WindowManager {
    pub(crate) toolkit: Toolkit,
    pub(crate) tree: WidgetTree,
    pub(crate) kinds: KindRegistry<WindowManager>,
    pub(crate) kind: KindId,
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) node_of: SecondaryMap<WidgetId, NodeId>,
    pub(crate) workspaces: Vec<Workspace>,
    workspace_ids: SlotMap<WorkspaceId, usize>,
    pub(crate) current: usize,
    pub(crate) tagged: Vec<WidgetId>,
    pub(crate) menu: Option<PopupMenu>,
    pub(crate) event_stack: bool,
    pub(crate) mode: InputMode,
    pub(crate) ignore_keys: bool,
    pub(crate) screen: Size,
    next_layer: u64,
    pub(crate) decoder: KeyDecoder,
    signals: WmSignals,
}

impl ActionHost for WindowManager {
    type Target = ();
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.nodes.len())
            .field("workspaces", &self.workspaces.len())
            .field("current", &self.current)
            .field("mode", &self.mode)
            .field("screen", &self.screen)
            .finish()
    }
}

impl WindowManager {
    /// Create a window manager for a screen of `screen` cells.
    ///
    /// One workspace is created per configured `[Workspace-N]` rule; without
    /// any rules a single workspace named `1` exists.
    pub fn new(toolkit: Toolkit, screen: Size) -> Self {
        let tree = WidgetTree::new(toolkit.clone());
        let mut kinds = KindRegistry::new(toolkit.clone());
        let kind = kinds.insert_kind("WM", None, actions::wm_class_init);
        // Bound triggers must be known to the decoder before the first key.
        if let Err(err) = kinds.resolve(kind) {
            tracing::warn!(target: targets::WM, %err, "wm bindings could not be resolved");
        }

        let mut wm = Self {
            toolkit,
            tree,
            kinds,
            kind,
            nodes: SlotMap::with_key(),
            node_of: SecondaryMap::new(),
            workspaces: Vec::new(),
            workspace_ids: SlotMap::with_key(),
            current: 0,
            tagged: Vec::new(),
            menu: None,
            event_stack: false,
            mode: InputMode::Normal,
            ignore_keys: false,
            screen,
            next_layer: 0,
            decoder: KeyDecoder::new(),
            signals: WmSignals::default(),
        };

        let rules = wm.toolkit.config().workspaces().to_vec();
        if rules.is_empty() {
            wm.push_workspace(Workspace::new("1", None));
        }
        for rule in rules {
            let name = rule.name.clone();
            wm.push_workspace(Workspace::new(name, Some(rule)));
        }
        tracing::debug!(
            target: targets::WM,
            workspaces = wm.workspaces.len(),
            width = screen.width,
            height = screen.height,
            "window manager started"
        );
        wm
    }

    fn push_workspace(&mut self, workspace: Workspace) -> usize {
        self.workspaces.push(workspace);
        let index = self.workspaces.len() - 1;
        self.workspace_ids.insert(index);
        index
    }

    fn workspace_index(&self, id: WorkspaceId) -> Option<usize> {
        self.workspace_ids.get(id).copied()
    }

    fn workspace_id(&self, index: usize) -> Option<WorkspaceId> {
        self.workspace_ids
            .iter()
            .find_map(|(id, &i)| (i == index).then_some(id))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn signals(&self) -> &WmSignals {
        &self.signals
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    pub fn is_ignoring_keys(&self) -> bool {
        self.ignore_keys
    }

    pub fn active_menu(&self) -> Option<PopupMenu> {
        self.menu
    }

    /// The node of a managed window.
    pub fn node(&self, window: WidgetId) -> Option<&Node> {
        self.node_of.get(window).and_then(|&id| self.nodes.get(id))
    }

    pub(crate) fn node_mut(&mut self, window: WidgetId) -> Option<&mut Node> {
        let id = *self.node_of.get(window)?;
        self.nodes.get_mut(id)
    }

    pub fn is_managed(&self, window: WidgetId) -> bool {
        self.node_of.contains_key(window)
    }

    /// Number of managed windows across all workspaces.
    pub fn window_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn current_workspace(&self) -> usize {
        self.current
    }

    /// The workspace index a window lives in.
    pub fn workspace_of(&self, window: WidgetId) -> Option<usize> {
        self.node(window).and_then(|node| self.workspace_index(node.workspace))
    }

    /// The focused window of the current workspace.
    pub fn focused_window(&self) -> Option<WidgetId> {
        self.workspaces.get(self.current).and_then(Workspace::focused)
    }

    pub fn tagged(&self) -> &[WidgetId] {
        &self.tagged
    }

    /// The WM kind's bindings, as `(trigger, action)` rows.
    pub fn binding_help(&mut self) -> Vec<BindingHelpRow> {
        self.kinds.binding_help(self.kind)
    }

    /// Add (or replace) a WM action, optionally bound to a human trigger.
    pub fn register_action(&mut self, name: &str, callback: ActionCallback<WindowManager>, trigger: Option<&str>) -> Result<()> {
        let trigger = trigger.and_then(|human| self.toolkit.translate(human));
        self.kinds
            .register_action(self.kind, name, callback, trigger.as_deref(), None)
    }

    /// Run a WM action by name.
    pub fn perform_named(&mut self, name: &str, params: &[ActionParam]) -> bool {
        let Some(invocation) = self.kinds.lookup_named(self.kind, name, params) else {
            tracing::debug!(target: targets::WM, action = name, "unknown wm action");
            return false;
        };
        let handled = invocation.invoke(self, ());
        self.process_requests();
        handled
    }

    pub(crate) fn perform_wm_key(&mut self, key: &[u8]) -> bool {
        self.kinds
            .lookup_key(self.kind, key)
            .is_some_and(|invocation| invocation.invoke(self, ()))
    }

    // =========================================================================
    // Managing windows
    // =========================================================================

    /// Take a top-level widget under management.
    ///
    /// The window is mapped, placed in the workspace whose rule claims its
    /// name or title (else the current one), centered if it was never
    /// positioned, and clamped to the screen. While handling input the new
    /// window is focused; otherwise it only rises and is marked urgent,
    /// unless its workspace had no focused window yet.
    pub fn new_window(&mut self, window: WidgetId) -> Result<()> {
        if self.is_managed(window) {
            return Ok(());
        }
        if !self.tree.contains(window) {
            return Err(TesseraError::InvalidWidget);
        }
        if self.tree.parent(window).is_some() {
            return Err(TesseraError::AlreadyParented);
        }

        self.tree.map(window);
        let index = self.placement_for(window);
        let Some(workspace) = self.workspace_id(index) else {
            return Err(TesseraError::InvalidWorkspace(index));
        };

        let Some(base) = self.tree.base(window) else {
            return Err(TesseraError::InvalidWidget);
        };
        let (size, positioned, origin) = (base.size(), base.is_positioned(), base.position());
        let origin = if positioned {
            origin
        } else {
            Point::new(
                (self.screen.width - size.width) / 2,
                (self.screen.height - size.height) / 2,
            )
        };
        let origin = self.clamp_origin(origin, size);
        self.tree.place(window, origin.x, origin.y);

        let layer = self.raise_layer();
        let node = self.nodes.insert(Node {
            widget: window,
            workspace,
            layer,
            scroll: 0,
        });
        self.node_of.insert(window, node);
        let had_focus = self.workspaces[index].focused().is_some();
        self.workspaces[index].push(window);
        tracing::debug!(target: targets::WM, ?window, workspace = index, x = origin.x, y = origin.y, "window managed");
        self.signals.window_created.emit(window);

        if self.event_stack || (index == self.current && !had_focus) {
            self.give_focus(window);
        } else {
            self.tree.set_flag(window, WidgetFlags::URGENT, true);
            self.tree.draw(window);
        }
        Ok(())
    }

    fn placement_for(&self, window: WidgetId) -> usize {
        let name = self.tree.base(window).and_then(|base| base.name());
        let title = self.tree.box_ref(window).and_then(BoxWidget::title);
        self.workspaces
            .iter()
            .position(|ws| ws.claims(name, title))
            .unwrap_or(self.current)
    }

    fn raise_layer(&mut self) -> u64 {
        self.next_layer += 1;
        self.next_layer
    }

    /// Keep a window of `size` on screen as far as possible.
    pub(crate) fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        Point::new(
            origin.x.min(self.screen.width - size.width).max(0),
            origin.y.min(self.screen.height - size.height).max(0),
        )
    }

    /// Focus a managed window, switching to its workspace if needed.
    pub fn give_focus(&mut self, window: WidgetId) -> bool {
        let Some(index) = self.workspace_of(window) else {
            return false;
        };
        if index != self.current {
            self.switch_to(index);
        }
        let old = self.focused_window();
        self.workspaces[index].bring_to_front(window);
        let layer = self.raise_layer();
        if let Some(node) = self.node_mut(window) {
            node.layer = layer;
        }
        self.tree.set_flag(window, WidgetFlags::URGENT, false);

        if old != Some(window) {
            if let Some(old) = old {
                self.tree.set_focus(old, false);
                self.tree.draw(old);
            }
            self.tree.set_focus(window, true);
            tracing::debug!(target: targets::WM, ?window, "window focused");
            self.signals.focus_changed.emit(window);
        }
        self.tree.draw(window);
        true
    }

    /// Close a window unless a `confirm_close` slot vetoes it.
    pub fn close_window(&mut self, window: WidgetId) -> bool {
        if !self.is_managed(window) {
            return false;
        }
        if !self.signals.confirm_close.emit(&window) {
            tracing::debug!(target: targets::WM, ?window, "close vetoed");
            return false;
        }
        self.unmanage(window);
        self.tree.destroy(window);
        self.process_requests();
        true
    }

    /// Forget a window. Focus passes to the next window in focus history.
    pub(crate) fn unmanage(&mut self, window: WidgetId) {
        let Some(node) = self.node_of.remove(window) else {
            return;
        };
        let workspace = self.nodes.remove(node).map(|node| node.workspace);
        let index = workspace.and_then(|ws| self.workspace_index(ws));
        let was_focused = index == Some(self.current) && self.focused_window() == Some(window);
        if let Some(index) = index {
            self.workspaces[index].remove(window);
        }
        self.tagged.retain(|&w| w != window);
        if self.menu.is_some_and(|menu| menu.owner == window) {
            self.dismiss_menu();
        }
        if self.mode.window() == Some(window) {
            self.set_mode(InputMode::Normal);
        }
        tracing::debug!(target: targets::WM, ?window, "window released");
        self.signals.window_closed.emit(window);

        if was_focused {
            self.tree.set_focus(window, false);
            self.focus_current_front();
        }
    }

    /// Hand focus to the front of the current workspace's history.
    fn focus_current_front(&mut self) {
        if let Some(next) = self.focused_window() {
            self.tree.set_focus(next, true);
            self.tree.draw(next);
            self.signals.focus_changed.emit(next);
        }
    }

    /// Act on everything the widget tree queued.
    pub(crate) fn process_requests(&mut self) {
        loop {
            let requests = self.tree.drain_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                match request {
                    TreeRequest::CloseWindow(id) => {
                        let window = self.tree.root_of(id);
                        self.close_window(window);
                    }
                    TreeRequest::ShowMenu { owner, menu } => self.show_menu(owner, menu),
                    TreeRequest::DismissMenu => {
                        self.dismiss_menu();
                    }
                    TreeRequest::Released(id) => {
                        if self.menu.is_some_and(|menu| menu.menu == id) {
                            self.menu = None;
                        }
                        self.unmanage(id);
                    }
                    TreeRequest::ContextMenu(id) => self.signals.context_menu.emit(id),
                }
            }
        }
    }

    pub(crate) fn set_mode(&mut self, mode: InputMode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!(target: targets::WM, from = %self.mode, to = %mode, "input mode changed");
        self.mode = mode;
        self.signals.mode_changed.emit(mode);
    }

    // =========================================================================
    // Workspaces
    // =========================================================================

    /// Append a workspace, named after its position when `name` is `None`.
    pub fn new_workspace(&mut self, name: Option<&str>) -> usize {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| (self.workspaces.len() + 1).to_string());
        let index = self.push_workspace(Workspace::new(name, None));
        tracing::debug!(target: targets::WM, index, "workspace created");
        index
    }

    /// Show another workspace.
    pub fn switch_workspace(&mut self, index: usize) -> Result<()> {
        if index >= self.workspaces.len() {
            return Err(TesseraError::InvalidWorkspace(index));
        }
        self.switch_to(index);
        Ok(())
    }

    fn switch_to(&mut self, index: usize) {
        if index == self.current {
            return;
        }
        self.dismiss_menu();
        if self.mode.window().is_some() {
            self.set_mode(InputMode::Normal);
        }
        let old = self.focused_window();
        self.current = index;
        if let Some(old) = old {
            self.tree.set_focus(old, false);
        }
        tracing::debug!(target: targets::WM, index, "workspace switched");
        self.signals.workspace_switched.emit(index);
        self.focus_current_front();
    }

    /// Move a managed window to another workspace.
    pub fn move_window_to_workspace(&mut self, window: WidgetId, index: usize) -> Result<()> {
        let Some(from) = self.workspace_of(window) else {
            return Err(TesseraError::UnmanagedWindow);
        };
        let Some(target) = self.workspace_id(index) else {
            return Err(TesseraError::InvalidWorkspace(index));
        };
        if from == index {
            return Ok(());
        }
        let was_focused = from == self.current && self.focused_window() == Some(window);
        self.workspaces[from].remove(window);
        self.workspaces[index].push(window);
        if let Some(node) = self.node_mut(window) {
            node.workspace = target;
        }
        tracing::debug!(target: targets::WM, ?window, from, to = index, "window moved to workspace");
        if was_focused {
            self.tree.set_focus(window, false);
            self.focus_current_front();
        }
        Ok(())
    }

    /// Tag or untag a window. Returns whether it is now tagged.
    pub fn toggle_tag(&mut self, window: WidgetId) -> bool {
        if !self.is_managed(window) {
            return false;
        }
        if let Some(position) = self.tagged.iter().position(|&w| w == window) {
            self.tagged.remove(position);
            false
        } else {
            self.tagged.push(window);
            true
        }
    }

    /// Move every tagged window to the current workspace and clear the tags.
    pub fn place_tagged(&mut self) -> usize {
        let tagged = std::mem::take(&mut self.tagged);
        let mut moved = 0;
        for window in tagged {
            if self.move_window_to_workspace(window, self.current).is_ok() {
                moved += 1;
            }
        }
        moved
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Record a new screen size and pull every window back on screen.
    pub fn set_screen_size(&mut self, size: Size) {
        self.screen = size;
        let windows: Vec<WidgetId> = self.nodes.values().map(|node| node.widget).collect();
        for window in windows {
            let Some(base) = self.tree.base(window) else {
                continue;
            };
            let (origin, extent) = (base.position(), base.size());
            let clamped = self.clamp_origin(origin, extent);
            if clamped != origin {
                self.tree.place(window, clamped.x, clamped.y);
            }
            self.clamp_scroll(window);
        }
        tracing::debug!(target: targets::WM, width = size.width, height = size.height, "screen resized");
    }

    /// Scroll a window taller than the screen. Returns whether it moved.
    pub fn scroll_window(&mut self, window: WidgetId, delta: i32) -> bool {
        let Some(limit) = self.scroll_limit(window) else {
            return false;
        };
        let Some(node) = self.node_mut(window) else {
            return false;
        };
        let scroll = (node.scroll + delta).clamp(0, limit);
        if scroll == node.scroll {
            return false;
        }
        node.scroll = scroll;
        true
    }

    fn scroll_limit(&self, window: WidgetId) -> Option<i32> {
        let base = self.tree.base(window)?;
        Some((base.size().height - (self.screen.height - base.position().y)).max(0))
    }

    fn clamp_scroll(&mut self, window: WidgetId) {
        let limit = self.scroll_limit(window).unwrap_or(0);
        if let Some(node) = self.node_mut(window) {
            node.scroll = node.scroll.min(limit);
        }
    }

    /// Swap a window with its neighbour in placement order.
    pub fn shift_window(&mut self, window: WidgetId, forward: bool) -> bool {
        let Some(index) = self.workspace_of(window) else {
            return false;
        };
        let list = &mut self.workspaces[index].list;
        let Some(position) = list.iter().position(|&w| w == window) else {
            return false;
        };
        let other = if forward {
            position + 1
        } else {
            let Some(other) = position.checked_sub(1) else {
                return false;
            };
            other
        };
        if other >= list.len() {
            return false;
        }
        list.swap(position, other);
        true
    }

    /// Redraw every window of the current workspace.
    pub fn refresh(&mut self) {
        let windows = self.workspaces[self.current].list.clone();
        for window in windows {
            self.tree.draw(window);
        }
    }

    // =========================================================================
    // Foreground children
    // =========================================================================

    /// Suspend input while a foreground child process runs.
    pub fn wait_on_child(&mut self, pid: u32) {
        self.set_mode(InputMode::WaitOnChild { pid });
    }

    /// A child process exited. Leaves WAIT_ON_CHILD if it was the one being
    /// waited on and returns whether it was.
    pub fn child_exited(&mut self, pid: u32, status: i32) -> bool {
        if self.mode != (InputMode::WaitOnChild { pid }) {
            tracing::trace!(target: targets::WM, pid, status, "unrelated child exited");
            return false;
        }
        tracing::debug!(target: targets::WM, pid, status, "foreground child exited");
        self.set_mode(InputMode::Normal);
        self.refresh();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tessera_style::StyleConfig;

    use super::*;

    fn manager() -> WindowManager {
        WindowManager::new(Toolkit::default(), Size::new(80, 24))
    }

    fn window(wm: &mut WindowManager, title: &str) -> WidgetId {
        let window = wm.tree_mut().new_window(title);
        let label = wm.tree_mut().new_label("hello world");
        wm.tree_mut().add_widget(window, label).unwrap();
        window
    }

    #[test]
    fn test_default_workspace() {
        let wm = manager();
        assert_eq!(wm.workspaces().len(), 1);
        assert_eq!(wm.workspaces()[0].name(), "1");
        assert_eq!(wm.current_workspace(), 0);
    }

    #[test]
    fn test_configured_workspaces() {
        let config = StyleConfig::from_str(
            "[Workspace-1]\nname = main\n\n[Workspace-2]\nname = chat\nwindow-names = buddylist\n",
        )
        .unwrap();
        let mut wm = WindowManager::new(Toolkit::init(config), Size::new(80, 24));
        assert_eq!(wm.workspaces().len(), 2);

        let buddies = window(&mut wm, "Buddies");
        wm.tree_mut().set_name(buddies, "buddylist");
        wm.new_window(buddies).unwrap();
        assert_eq!(wm.workspace_of(buddies), Some(1));
        assert_eq!(wm.current_workspace(), 0);
    }

    #[test]
    fn test_first_window_is_centered_and_focused() {
        let mut wm = manager();
        let win = window(&mut wm, "Hi");
        wm.new_window(win).unwrap();

        let base = wm.tree().base(win).unwrap();
        let size = base.size();
        assert_eq!(base.position(), Point::new((80 - size.width) / 2, (24 - size.height) / 2));
        assert_eq!(wm.focused_window(), Some(win));
        assert!(base.has_focus());
    }

    #[test]
    fn test_window_outside_input_is_marked_urgent() {
        let mut wm = manager();
        let first = window(&mut wm, "One");
        let second = window(&mut wm, "Two");
        wm.new_window(first).unwrap();
        wm.new_window(second).unwrap();

        assert_eq!(wm.focused_window(), Some(first));
        assert!(wm.tree().base(second).unwrap().has_flag(WidgetFlags::URGENT));
        assert!(wm.node(second).unwrap().layer() > wm.node(first).unwrap().layer());

        assert!(wm.give_focus(second));
        assert!(!wm.tree().base(second).unwrap().has_flag(WidgetFlags::URGENT));
        assert!(!wm.tree().base(first).unwrap().has_focus());
    }

    #[test]
    fn test_window_created_during_input_takes_focus() {
        let mut wm = manager();
        let first = window(&mut wm, "One");
        wm.new_window(first).unwrap();

        let second = window(&mut wm, "Two");
        wm.event_stack = true;
        wm.new_window(second).unwrap();
        wm.event_stack = false;
        assert_eq!(wm.focused_window(), Some(second));
    }

    #[test]
    fn test_positioned_window_is_clamped() {
        let mut wm = manager();
        let win = window(&mut wm, "Edge");
        wm.tree_mut().set_position(win, 200, 200);
        wm.new_window(win).unwrap();
        let base = wm.tree().base(win).unwrap();
        assert_eq!(base.position().x, 80 - base.size().width);
        assert_eq!(base.position().y, 24 - base.size().height);
    }

    #[test]
    fn test_new_window_rejects_children() {
        let mut wm = manager();
        let win = window(&mut wm, "Parent");
        let child = wm.tree().children(win)[0];
        assert!(matches!(wm.new_window(child), Err(TesseraError::AlreadyParented)));
    }

    #[test]
    fn test_close_can_be_vetoed() {
        let mut wm = manager();
        let win = window(&mut wm, "Keep");
        wm.new_window(win).unwrap();

        let id = wm.signals().confirm_close.connect(|_| false);
        assert!(!wm.close_window(win));
        assert!(wm.is_managed(win));

        wm.signals().confirm_close.disconnect(id);
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = closed.clone();
        wm.signals().window_closed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(wm.close_window(win));
        assert!(!wm.is_managed(win));
        assert!(!wm.tree().contains(win));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closing_focused_window_focuses_previous() {
        let mut wm = manager();
        let first = window(&mut wm, "One");
        let second = window(&mut wm, "Two");
        wm.new_window(first).unwrap();
        wm.new_window(second).unwrap();
        wm.give_focus(second);

        wm.close_window(second);
        assert_eq!(wm.focused_window(), Some(first));
        assert!(wm.tree().base(first).unwrap().has_focus());
    }

    #[test]
    fn test_destroying_a_window_unmanages_it() {
        let mut wm = manager();
        let win = window(&mut wm, "Gone");
        wm.new_window(win).unwrap();
        wm.tree_mut().destroy(win);
        wm.process_requests();
        assert!(!wm.is_managed(win));
        assert_eq!(wm.window_count(), 0);
    }

    #[test]
    fn test_workspace_switch_moves_focus() {
        let mut wm = manager();
        let first = window(&mut wm, "One");
        wm.new_window(first).unwrap();
        let second_ws = wm.new_workspace(None);
        assert_eq!(wm.workspaces()[second_ws].name(), "2");

        let other = window(&mut wm, "Other");
        wm.new_window(other).unwrap();
        wm.move_window_to_workspace(other, second_ws).unwrap();

        wm.switch_workspace(second_ws).unwrap();
        assert_eq!(wm.focused_window(), Some(other));
        assert!(!wm.tree().base(first).unwrap().has_focus());
        assert!(matches!(wm.switch_workspace(9), Err(TesseraError::InvalidWorkspace(9))));
    }

    #[test]
    fn test_place_tagged_gathers_windows() {
        let mut wm = manager();
        let win = window(&mut wm, "Tagged");
        wm.new_window(win).unwrap();
        assert!(wm.toggle_tag(win));

        let second = wm.new_workspace(Some("two"));
        wm.switch_workspace(second).unwrap();
        assert_eq!(wm.place_tagged(), 1);
        assert_eq!(wm.workspace_of(win), Some(second));
        assert!(wm.tagged().is_empty());
    }

    #[test]
    fn test_screen_shrink_reclamps_windows() {
        let mut wm = manager();
        let win = window(&mut wm, "Moving");
        wm.tree_mut().set_position(win, 60, 15);
        wm.new_window(win).unwrap();
        wm.set_screen_size(Size::new(40, 12));
        let base = wm.tree().base(win).unwrap();
        assert!(base.position().x + base.size().width <= 40);
        assert!(base.position().y + base.size().height <= 12);
    }

    #[test]
    fn test_wait_on_child() {
        let mut wm = manager();
        wm.wait_on_child(42);
        assert_eq!(wm.mode(), InputMode::WaitOnChild { pid: 42 });
        assert!(!wm.child_exited(7, 0));
        assert!(wm.child_exited(42, 0));
        assert!(wm.mode().is_normal());
    }

    #[test]
    fn test_shift_window_within_bounds() {
        let mut wm = manager();
        let first = window(&mut wm, "One");
        let second = window(&mut wm, "Two");
        wm.new_window(first).unwrap();
        wm.new_window(second).unwrap();

        assert!(!wm.shift_window(first, false));
        assert!(wm.shift_window(first, true));
        assert_eq!(wm.workspaces()[0].windows(), &[second, first]);
        assert!(!wm.shift_window(first, true));
    }
}
