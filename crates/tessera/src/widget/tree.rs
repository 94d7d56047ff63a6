//! The widget arena.
//!
//! [`WidgetTree`] owns every widget value together with its
//! [`WidgetBase`], the per-kind binding registry for widget kinds, and the
//! focus chains of root boxes. Hooks are dispatched by temporarily taking
//! the widget value out of its slot, so a hook can freely call back into the
//! tree for its children.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};
use tessera_core::logging::targets;
use tessera_core::{MouseEvent, Result, TesseraError};
use tessera_render::{CellStyle, Point, Size, Surface};
use tessera_style::ColorRole;

use super::base::WidgetBase;
use super::box_widget::BoxWidget;
use super::flags::WidgetFlags;
use super::focus::FocusChain;
use super::kinds::{self, BuiltinKinds};
use super::label::Label;
use super::traits::Widget;
use super::window::Window;
use super::WidgetId;
use crate::binding::{ActionHost, ActionParam, ClassInit, KindId, KindRegistry};
use crate::toolkit::Toolkit;

pub(crate) struct WidgetSlot {
    pub(crate) base: WidgetBase,
    widget: Option<Box<dyn Widget>>,
}

/// Work a widget asks its owner (normally the window manager) to do.
///
/// Widgets queue requests from inside action callbacks; the owner drains
/// them after each dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRequest {
    /// Close the top-level window.
    CloseWindow(WidgetId),
    /// Pop up `menu` on behalf of `owner`.
    ShowMenu { owner: WidgetId, menu: WidgetId },
    /// Dismiss the active popup menu.
    DismissMenu,
    /// A top-level widget was destroyed and must be forgotten.
    Released(WidgetId),
    /// A context menu was requested for a widget.
    ContextMenu(WidgetId),
}

/// Arena of widgets plus the binding registry of widget kinds.
pub struct WidgetTree {
    toolkit: Toolkit,
    kinds: KindRegistry<WidgetTree>,
    builtin: BuiltinKinds,
    slots: SlotMap<WidgetId, WidgetSlot>,
    pub(crate) focus_chains: SecondaryMap<WidgetId, FocusChain>,
    pub(crate) menus: SecondaryMap<WidgetId, WidgetId>,
    requests: VecDeque<TreeRequest>,
}

impl ActionHost for WidgetTree {
    type Target = WidgetId;
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("widgets", &self.slots.len())
            .field("kinds", &self.kinds)
            .field("pending_requests", &self.requests.len())
            .finish()
    }
}

impl WidgetTree {
    /// Create an empty tree with the built-in widget kinds registered.
    pub fn new(toolkit: Toolkit) -> Self {
        let mut kinds = KindRegistry::new(toolkit.clone());
        let builtin = kinds::register_builtin(&mut kinds);
        Self {
            toolkit,
            kinds,
            builtin,
            slots: SlotMap::with_key(),
            focus_chains: SecondaryMap::new(),
            menus: SecondaryMap::new(),
            requests: VecDeque::new(),
        }
    }

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    /// The binding registry of widget kinds.
    pub fn kinds(&mut self) -> &mut KindRegistry<WidgetTree> {
        &mut self.kinds
    }

    /// The ids of the built-in kinds.
    pub fn builtin_kinds(&self) -> BuiltinKinds {
        self.builtin
    }

    /// Register an application widget kind.
    pub fn register_kind(&mut self, name: &str, parent: Option<KindId>, class_init: ClassInit<WidgetTree>) -> Result<KindId> {
        self.kinds.register_kind(name, parent, class_init)
    }

    /// The style for a color role under the current configuration.
    pub fn style(&self, role: ColorRole) -> CellStyle {
        self.toolkit.config().style(role)
    }

    // =========================================================================
    // Creation and access
    // =========================================================================

    /// Insert a widget of a registered kind.
    pub fn insert<W: Widget>(&mut self, kind: KindId, widget: W) -> Result<WidgetId> {
        let name = self
            .kinds
            .kind_name(kind)
            .ok_or_else(|| TesseraError::UnknownKind(format!("{kind:?}")))?
            .to_string();
        self.kinds.resolve(kind)?;
        let id = self.insert_unchecked(kind, widget);
        tracing::trace!(target: targets::WIDGET, ?id, kind = %name, "widget created");
        Ok(id)
    }

    fn insert_unchecked<W: Widget>(&mut self, kind: KindId, widget: W) -> WidgetId {
        if let Err(err) = self.kinds.resolve(kind) {
            tracing::warn!(target: targets::BINDINGS, ?kind, %err, "kind could not be resolved");
        }
        let base = WidgetBase::new(kind, widget.default_flags());
        self.slots.insert(WidgetSlot {
            base,
            widget: Some(Box::new(widget)),
        })
    }

    /// Create a box (no border by default).
    pub fn new_box(&mut self, vertical: bool, homogeneous: bool) -> WidgetId {
        let kind = self.builtin.box_kind;
        self.insert_unchecked(kind, BoxWidget::new(vertical, homogeneous))
    }

    /// Create a top-level window: a bordered vertical box with a title.
    pub fn new_window(&mut self, title: &str) -> WidgetId {
        let kind = self.builtin.window;
        self.insert_unchecked(kind, Window::new(title))
    }

    /// Create a text label.
    pub fn new_label(&mut self, text: &str) -> WidgetId {
        let kind = self.builtin.label;
        self.insert_unchecked(kind, Label::new(text))
    }

    /// Attach a menu to a window; `show-menu` pops it up. The window
    /// destroys its menu when it is destroyed.
    pub fn set_window_menu(&mut self, window: WidgetId, menu: Option<WidgetId>) {
        match menu {
            Some(menu) => {
                self.menus.insert(window, menu);
            }
            None => {
                self.menus.remove(window);
            }
        }
    }

    pub fn window_menu(&self, window: WidgetId) -> Option<WidgetId> {
        self.menus.get(window).copied()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn base(&self, id: WidgetId) -> Option<&WidgetBase> {
        self.slots.get(id).map(|slot| &slot.base)
    }

    pub fn base_mut(&mut self, id: WidgetId) -> Option<&mut WidgetBase> {
        self.slots.get_mut(id).map(|slot| &mut slot.base)
    }

    /// Downcast a widget value. Returns `None` while the widget runs a hook.
    pub fn get<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.slots.get(id)?.widget.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.slots
            .get_mut(id)?
            .widget
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// The container state of a box or window.
    pub fn box_ref(&self, id: WidgetId) -> Option<&BoxWidget> {
        self.slots.get(id)?.widget.as_deref()?.as_box()
    }

    pub fn box_mut(&mut self, id: WidgetId) -> Option<&mut BoxWidget> {
        self.slots.get_mut(id)?.widget.as_deref_mut()?.as_box_mut()
    }

    pub fn is_box(&self, id: WidgetId) -> bool {
        self.box_ref(id).is_some()
    }

    /// The kind name of a widget.
    pub fn kind_name(&self, id: WidgetId) -> Option<&str> {
        self.kinds.kind_name(self.base(id)?.kind)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.base(id).and_then(WidgetBase::parent)
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.base(id).map(|base| base.children.clone()).unwrap_or_default()
    }

    /// The top-most ancestor of a widget (itself if it has no parent).
    pub fn root_of(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn set_name(&mut self, id: WidgetId, name: &str) {
        if let Some(base) = self.base_mut(id) {
            base.name = Some(name.to_string());
        }
    }

    pub fn set_flag(&mut self, id: WidgetId, flag: WidgetFlags, on: bool) {
        if let Some(base) = self.base_mut(id) {
            base.flags.set(flag, on);
        }
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        self.set_flag(id, WidgetFlags::INVISIBLE, !visible);
    }

    pub fn set_min_size(&mut self, id: WidgetId, width: i32, height: i32) {
        if let Some(base) = self.base_mut(id) {
            base.min_width = width.max(1);
            base.min_height = height.max(1);
        }
    }

    /// Mutable access to a widget's surface, present once mapped.
    pub fn surface_mut(&mut self, id: WidgetId) -> Option<&mut Surface> {
        self.base_mut(id)?.surface.as_mut()
    }

    /// Run a hook with the widget value detached from its slot.
    fn call<R>(&mut self, id: WidgetId, default: R, f: impl FnOnce(&mut dyn Widget, &mut WidgetTree) -> R) -> R {
        let Some(mut widget) = self.slots.get_mut(id).and_then(|slot| slot.widget.take()) else {
            return default;
        };
        let result = f(widget.as_mut(), self);
        if let Some(slot) = self.slots.get_mut(id) {
            slot.widget = Some(widget);
        }
        result
    }

    /// Run a closure against the container state of a box, with the tree
    /// available. Returns `None` if `id` is not a box.
    pub(crate) fn with_box<R>(&mut self, id: WidgetId, f: impl FnOnce(&mut BoxWidget, &mut WidgetTree) -> R) -> Option<R> {
        self.call(id, None, |widget, tree| widget.as_box_mut().map(|boxed| f(boxed, tree)))
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Compute a widget's natural size.
    ///
    /// A non-empty measurement is raised to the widget's minimum size.
    pub fn measure(&mut self, id: WidgetId) {
        self.call(id, (), |widget, tree| widget.measure(tree, id));
        let Some(base) = self.base(id) else {
            return;
        };
        if base.is_unsized() {
            return;
        }
        let (width, height) = (base.width.max(base.min_width), base.height.max(base.min_height));
        if (width, height) != (base.width, base.height) {
            self.commit_size(id, width, height);
        }
    }

    /// Move a widget (and, for boxes, its children) to an absolute position.
    pub fn place(&mut self, id: WidgetId, x: i32, y: i32) {
        self.call(id, (), |widget, tree| widget.place(tree, id, x, y));
    }

    /// Record a position without running hooks.
    pub fn set_position(&mut self, id: WidgetId, x: i32, y: i32) {
        if let Some(base) = self.base_mut(id) {
            base.x = x;
            base.y = y;
            base.positioned = true;
        }
    }

    /// Ask a widget whether it accepts a size.
    pub fn confirm_size(&mut self, id: WidgetId, width: i32, height: i32) -> bool {
        self.call(id, false, |widget, tree| widget.confirm_size(tree, id, width, height))
    }

    /// The rules used by widgets that do not override `confirm_size`.
    pub fn default_confirm_size(&self, id: WidgetId, width: i32, height: i32) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        if width <= 0 || height <= 0 {
            return false;
        }
        if width < base.min_width || height < base.min_height {
            return false;
        }
        if width != base.width && !base.has_flag(WidgetFlags::GROW_X) {
            return false;
        }
        if height != base.height && !base.has_flag(WidgetFlags::GROW_Y) {
            return false;
        }
        true
    }

    /// Resize a widget.
    ///
    /// A non-positive dimension keeps the current value. A mapped widget must
    /// accept the size through `confirm_size` first; on veto nothing
    /// changes and `false` is returned. Otherwise the size is recorded, and
    /// for a mapped widget `size_changed` runs and the widget is redrawn.
    pub fn set_size(&mut self, id: WidgetId, width: i32, height: i32) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        let old = base.size();
        let mapped = base.is_mapped();
        let width = if width <= 0 { old.width } else { width };
        let height = if height <= 0 { old.height } else { height };
        if old == Size::new(width, height) {
            return true;
        }

        if mapped && !self.confirm_size(id, width, height) {
            tracing::trace!(target: targets::LAYOUT, ?id, width, height, "size vetoed");
            return false;
        }
        self.commit_size(id, width, height);
        if mapped {
            self.call(id, (), |widget, tree| widget.size_changed(tree, id, old));
            self.draw(id);
        }
        tracing::trace!(target: targets::LAYOUT, ?id, width, height, "size committed");
        true
    }

    /// Record a size without negotiation or hooks.
    pub fn force_size(&mut self, id: WidgetId, width: i32, height: i32) {
        self.commit_size(id, width.max(0), height.max(0));
    }

    fn commit_size(&mut self, id: WidgetId, width: i32, height: i32) {
        if let Some(base) = self.base_mut(id) {
            base.width = width;
            base.height = height;
            if let Some(surface) = base.surface.as_mut() {
                surface.resize(width, height);
            }
        }
    }

    /// Give a widget its surface, measuring it first if it is unsized.
    pub fn map(&mut self, id: WidgetId) {
        let Some(base) = self.base(id) else {
            return;
        };
        if base.is_mapped() {
            return;
        }
        if base.is_unsized() {
            self.measure(id);
        }
        if let Some(base) = self.base_mut(id) {
            base.surface = Some(Surface::new(base.width, base.height));
            base.flags.insert(WidgetFlags::MAPPED);
        }
        self.call(id, (), |widget, tree| widget.map(tree, id));
        tracing::trace!(target: targets::WIDGET, ?id, "widget mapped");
    }

    /// Draw a widget into its surface, mapping it first if needed.
    pub fn draw(&mut self, id: WidgetId) {
        let Some(base) = self.base(id) else {
            return;
        };
        if !base.is_mapped() {
            self.map(id);
        }
        if self.base(id).is_some_and(|base| !base.is_visible()) {
            return;
        }
        self.call(id, (), |widget, tree| widget.draw(tree, id));
    }

    /// Copy a drawn child's surface into its container's surface.
    pub(crate) fn blit_child(&mut self, parent: WidgetId, child: WidgetId) {
        let Some(origin) = self.base(parent).map(WidgetBase::position) else {
            return;
        };
        let Some(mut target) = self.base_mut(parent).and_then(|base| base.surface.take()) else {
            return;
        };
        if let Some(base) = self.base(child)
            && let Some(source) = base.surface.as_ref()
        {
            let dest = Point::new(base.x - origin.x, base.y - origin.y);
            target.copy_from(source, source.bounds(), dest);
        }
        if let Some(base) = self.base_mut(parent) {
            base.surface = Some(target);
        }
    }

    // =========================================================================
    // Input and focus
    // =========================================================================

    /// Deliver a key to a widget.
    ///
    /// Widgets that cannot take focus ignore keys. Unless the widget disables
    /// actions, its kind's bindings are tried before the raw hook.
    pub fn key_pressed(&mut self, id: WidgetId, key: &[u8]) -> bool {
        let Some(base) = self.base(id) else {
            return false;
        };
        if !base.can_take_focus() {
            return false;
        }
        if !base.has_flag(WidgetFlags::DISABLE_ACTIONS) && self.perform_key(id, key) {
            return true;
        }
        self.call(id, false, |widget, tree| widget.key_pressed(tree, id, key))
    }

    /// Deliver a mouse event at absolute screen coordinates.
    pub fn clicked(&mut self, id: WidgetId, event: MouseEvent, x: i32, y: i32) -> bool {
        self.call(id, false, |widget, tree| widget.clicked(tree, id, event, x, y))
    }

    /// Give or take focus. Hooks fire only on an actual change.
    ///
    /// Returns `false` if the widget cannot take focus.
    pub fn set_focus(&mut self, id: WidgetId, focus: bool) -> bool {
        let Some(base) = self.base_mut(id) else {
            return false;
        };
        if !base.can_take_focus() {
            return false;
        }
        if base.has_focus() == focus {
            return true;
        }
        base.flags.set(WidgetFlags::HAS_FOCUS, focus);
        tracing::trace!(target: targets::FOCUS, ?id, focus, "focus changed");
        if focus {
            self.call(id, (), |widget, tree| widget.gained_focus(tree, id));
        } else {
            self.call(id, (), |widget, tree| widget.lost_focus(tree, id));
        }
        true
    }

    /// Run the action bound to `key` for the widget's kind.
    pub fn perform_key(&mut self, id: WidgetId, key: &[u8]) -> bool {
        let Some(kind) = self.base(id).map(WidgetBase::kind) else {
            return false;
        };
        match self.kinds.lookup_key(kind, key) {
            Some(invocation) => invocation.invoke(self, id),
            None => false,
        }
    }

    /// Run a named action of the widget's kind.
    pub fn perform_named(&mut self, id: WidgetId, name: &str, params: &[ActionParam]) -> bool {
        let Some(kind) = self.base(id).map(WidgetBase::kind) else {
            return false;
        };
        match self.kinds.lookup_named(kind, name, params) {
            Some(invocation) => invocation.invoke(self, id),
            None => false,
        }
    }

    pub fn push_request(&mut self, request: TreeRequest) {
        self.requests.push_back(request);
    }

    /// Take every queued request, oldest first.
    pub fn drain_requests(&mut self) -> Vec<TreeRequest> {
        self.requests.drain(..).collect()
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroy a widget and everything it contains.
    ///
    /// Children are destroyed first. The widget is removed from its parent
    /// box; a top-level widget queues [`TreeRequest::Released`].
    pub fn destroy(&mut self, id: WidgetId) {
        let Some(base) = self.base_mut(id) else {
            return;
        };
        if base.has_flag(WidgetFlags::DESTROYING) {
            return;
        }
        base.flags.insert(WidgetFlags::DESTROYING);

        for child in self.children(id) {
            self.destroy(child);
        }
        self.call(id, (), |widget, tree| widget.destroy(tree, id));

        match self.parent(id) {
            Some(parent) => {
                self.remove_widget(parent, id);
            }
            None => {
                self.focus_chains.remove(id);
                self.push_request(TreeRequest::Released(id));
            }
        }
        self.slots.remove(id);
        tracing::trace!(target: targets::WIDGET, ?id, "widget destroyed");
    }

    // =========================================================================
    // Containers
    // =========================================================================

    /// Append a child to a box.
    pub fn add_widget(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(TesseraError::InvalidWidget);
        }
        if !self.is_box(parent) {
            return Err(TesseraError::NotAContainer);
        }
        if self.is_ancestor(child, parent) {
            return Err(TesseraError::CircularParentage);
        }
        if self.parent(child).is_some() {
            return Err(TesseraError::AlreadyParented);
        }

        if let Some(base) = self.base_mut(parent) {
            base.children.push(child);
        }
        if let Some(base) = self.base_mut(child) {
            base.parent = Some(parent);
        }
        self.focus_chains.remove(child);

        let root = self.root_of(parent);
        if self.focus_chains.contains_key(root) {
            self.rebuild_focus_chain(root);
        }
        tracing::trace!(target: targets::WIDGET, ?parent, ?child, "child added");
        Ok(())
    }

    /// Detach a child from a box. The child is not destroyed.
    ///
    /// The child and its descendants leave the root box's focus chain; if
    /// the active widget was among them focus moves on.
    pub fn remove_widget(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        let Some(base) = self.base_mut(parent) else {
            return false;
        };
        let Some(position) = base.children.iter().position(|&c| c == child) else {
            return false;
        };
        base.children.remove(position);
        let destroying = base.has_flag(WidgetFlags::DESTROYING);
        let mapped = base.is_mapped();
        if let Some(base) = self.base_mut(child) {
            base.parent = None;
        }

        let root = self.root_of(parent);
        let mut removed = Vec::new();
        self.collect_subtree(child, &mut removed);
        self.remove_from_focus(root, &removed);
        self.with_box(parent, |boxed, _| boxed.forget_child(child));

        if mapped && !destroying {
            self.readjust(parent);
        }
        tracing::trace!(target: targets::WIDGET, ?parent, ?child, "child removed");
        true
    }

    pub(crate) fn collect_subtree(&self, id: WidgetId, out: &mut Vec<WidgetId>) {
        out.push(id);
        if let Some(base) = self.base(id) {
            for &child in &base.children {
                self.collect_subtree(child, out);
            }
        }
    }

    /// Re-measure the whole hierarchy containing `id` after a structural
    /// change, then redraw it if mapped.
    pub fn readjust(&mut self, id: WidgetId) {
        let root = self.root_of(id);
        let _span = tracing::debug_span!(target: targets::LAYOUT, tessera_core::logging::span_names::LAYOUT).entered();
        self.measure(root);
        if let Some(base) = self.base(root) {
            let (x, y) = (base.x, base.y);
            self.place(root, x, y);
        }
        if self.base(root).is_some_and(WidgetBase::is_mapped) {
            self.draw(root);
        }
    }

    /// Iterate over every widget id.
    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.slots.keys()
    }
}
