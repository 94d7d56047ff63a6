//! The container widget and its size negotiation.
//!
//! A box lays its visible children out one after another along its main
//! axis (top to bottom for a vertical box), `pad` cells apart, inside an
//! optional one-cell border. On the cross axis each child is aligned
//! according to the box's [`Alignment`].
//!
//! # Resize negotiation
//!
//! When asked to change size, a box looks for one child willing to absorb
//! the whole change (the *delta absorber*), preferring any child over the
//! one that absorbed last time. For a change across the main axis the other
//! children must accept the same cross-axis change as well. Once the size is
//! committed, the absorber receives the full delta and every other child
//! only the cross-axis part.

use tessera_core::logging::targets;
use tessera_core::MouseEvent;
use tessera_render::{Point, Size};
use tessera_style::ColorRole;
use unicode_segmentation::UnicodeSegmentation;

use super::flags::WidgetFlags;
use super::focus::FocusDirection;
use super::traits::Widget;
use super::tree::WidgetTree;
use super::WidgetId;

/// Cross-axis placement of a box's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Left in a vertical box, top in a horizontal one.
    #[default]
    Start,
    Center,
    /// Right in a vertical box, bottom in a horizontal one.
    End,
}

/// A container of child widgets.
#[derive(Debug, Clone, Default)]
pub struct BoxWidget {
    vertical: bool,
    homogeneous: bool,
    fill: bool,
    pad: i32,
    alignment: Alignment,
    title: Option<String>,
    last_resize: Option<WidgetId>,
    size_queued: Option<WidgetId>,
}

impl BoxWidget {
    pub fn new(vertical: bool, homogeneous: bool) -> Self {
        Self {
            vertical,
            homogeneous,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn is_homogeneous(&self) -> bool {
        self.homogeneous
    }

    pub fn fills(&self) -> bool {
        self.fill
    }

    pub fn pad(&self) -> i32 {
        self.pad
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The child that absorbed the last size change.
    pub fn last_resize(&self) -> Option<WidgetId> {
        self.last_resize
    }

    pub fn set_vertical(&mut self, vertical: bool) {
        self.vertical = vertical;
    }

    /// Force every child to the largest cross-axis size.
    pub fn set_homogeneous(&mut self, homogeneous: bool) {
        self.homogeneous = homogeneous;
    }

    /// Force every child to the largest main-axis size.
    pub fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    /// Space between consecutive children.
    pub fn set_pad(&mut self, pad: i32) {
        self.pad = pad.max(0);
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    pub(crate) fn forget_child(&mut self, child: WidgetId) {
        if self.last_resize == Some(child) {
            self.last_resize = None;
        }
        if self.size_queued == Some(child) {
            self.size_queued = None;
        }
    }

    fn visible_children(tree: &WidgetTree, id: WidgetId) -> Vec<WidgetId> {
        tree.children(id)
            .into_iter()
            .filter(|&child| tree.base(child).is_some_and(|base| base.is_visible()))
            .collect()
    }

    /// Lay children out from the box's position and set the box's size to
    /// the bounding box of the result.
    pub(crate) fn reposition_children(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let Some(base) = tree.base(id) else {
            return;
        };
        let border = i32::from(base.has_border());
        let origin = base.position();
        let children = Self::visible_children(tree, id);

        let mut cursor = Point::new(origin.x + border, origin.y + border);
        let mut max_w = 0;
        let mut max_h = 0;
        let mut advanced = false;
        for &child in &children {
            tree.place(child, cursor.x, cursor.y);
            let size = tree.base(child).map(|base| base.size()).unwrap_or(Size::ZERO);
            if self.vertical {
                if size.height > 0 {
                    cursor.y += size.height + self.pad;
                    advanced = true;
                }
            } else if size.width > 0 {
                cursor.x += size.width + self.pad;
                advanced = true;
            }
            max_w = max_w.max(size.width);
            max_h = max_h.max(size.height);
        }
        if advanced {
            if self.vertical {
                cursor.y -= self.pad;
            } else {
                cursor.x -= self.pad;
            }
        }

        let (mut width, height) = if self.vertical {
            (max_w + 2 * border, cursor.y - origin.y + border)
        } else {
            (cursor.x - origin.x + border, max_h + 2 * border)
        };
        if border > 0
            && let Some(title) = &self.title
        {
            width = width.max(title.graphemes(true).count() as i32 + 4);
        }
        tree.force_size(id, width, height);

        for &child in &children {
            let Some(base) = tree.base(child) else {
                continue;
            };
            let (outer, inner, current) = if self.vertical {
                (width, base.width, base.x)
            } else {
                (height, base.height, base.y)
            };
            let room = outer - 2 * border;
            let offset = match self.alignment {
                Alignment::Start => 0,
                Alignment::Center => (room - inner) / 2,
                Alignment::End => room - inner,
            };
            let relative = (border + offset).min(outer - border - inner).max(border);
            let target = relative + if self.vertical { origin.x } else { origin.y };
            if target != current {
                let (x, y) = if self.vertical { (target, base.y) } else { (base.x, target) };
                tree.place(child, x, y);
            }
        }
    }

    fn negotiate(&mut self, tree: &mut WidgetTree, id: WidgetId, width: i32, height: i32) -> bool {
        let Some((current, min)) = tree.base(id).map(|base| (base.size(), base.min_size())) else {
            return false;
        };
        let wchange = current.width - width;
        let hchange = current.height - height;
        if wchange == 0 && hchange == 0 {
            return true;
        }
        if width <= 0 || height <= 0 || width < min.width || height < min.height {
            return false;
        }
        let children = Self::visible_children(tree, id);
        if children.is_empty() {
            return true;
        }

        let accepts = |tree: &mut WidgetTree, child: WidgetId| -> bool {
            let Some(size) = tree.base(child).map(|base| base.size()) else {
                return false;
            };
            size.width != 0
                && size.height != 0
                && tree.confirm_size(child, size.width - wchange, size.height - hchange)
        };

        let mut absorber = None;
        for &child in &children {
            if Some(child) == self.last_resize {
                continue;
            }
            if accepts(tree, child) {
                absorber = Some(child);
                break;
            }
        }
        if absorber.is_none()
            && let Some(last) = self.last_resize.filter(|last| children.contains(last))
            && accepts(tree, last)
        {
            absorber = Some(last);
        }
        let Some(absorber) = absorber else {
            self.size_queued = None;
            tracing::trace!(target: targets::LAYOUT, ?id, width, height, "no child absorbs the change");
            return false;
        };

        let absorbed = tree.base(absorber).map(|base| base.size()).unwrap_or(Size::ZERO);
        for &child in &children {
            if child == absorber {
                continue;
            }
            let Some(size) = tree.base(child).map(|base| base.size()) else {
                continue;
            };
            let rejected = if self.vertical && wchange > 0 {
                size.width >= absorbed.width && !tree.confirm_size(child, size.width - wchange, size.height)
            } else if !self.vertical && hchange > 0 {
                size.height >= absorbed.height && !tree.confirm_size(child, size.width, size.height - hchange)
            } else {
                false
            };
            if rejected {
                self.size_queued = None;
                tracing::trace!(target: targets::LAYOUT, ?id, ?child, "sibling rejects the cross-axis change");
                return false;
            }
        }

        self.size_queued = Some(absorber);
        true
    }

    fn apply_size_change(&mut self, tree: &mut WidgetTree, id: WidgetId, old: Size) {
        let Some(new) = tree.base(id).map(|base| base.size()) else {
            return;
        };
        let dw = new.width - old.width;
        let dh = new.height - old.height;
        let absorber = self.size_queued.take();

        for child in Self::visible_children(tree, id) {
            let Some(size) = tree.base(child).map(|base| base.size()) else {
                continue;
            };
            if Some(child) == absorber {
                tree.set_size(child, size.width + dw, size.height + dh);
                self.last_resize = Some(child);
            } else if self.vertical && dw != 0 {
                tree.set_size(child, size.width + dw, size.height);
            } else if !self.vertical && dh != 0 {
                tree.set_size(child, size.width, size.height + dh);
            }
        }
        tracing::debug!(target: targets::LAYOUT, ?id, dw, dh, absorber = ?absorber, "box resized");
        self.reposition_children(tree, id);
    }
}

impl Widget for BoxWidget {
    fn default_flags(&self) -> WidgetFlags {
        WidgetFlags::CAN_TAKE_FOCUS | WidgetFlags::DISABLE_ACTIONS | WidgetFlags::NO_BORDER
    }

    fn as_box(&self) -> Option<&BoxWidget> {
        Some(self)
    }

    fn as_box_mut(&mut self) -> Option<&mut BoxWidget> {
        Some(self)
    }

    fn measure(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let children = tree.children(id);
        for &child in &children {
            tree.measure(child);
        }

        let visible = Self::visible_children(tree, id);
        let (max_w, max_h) = visible.iter().fold((0, 0), |(w, h), &child| {
            let size = tree.base(child).map(|base| base.size()).unwrap_or(Size::ZERO);
            (w.max(size.width), h.max(size.height))
        });
        for &child in &visible {
            let Some(size) = tree.base(child).map(|base| base.size()) else {
                continue;
            };
            let mut target = size;
            if self.homogeneous {
                if self.vertical {
                    target.width = max_w;
                } else {
                    target.height = max_h;
                }
            }
            if self.fill {
                if self.vertical {
                    target.height = max_h;
                } else {
                    target.width = max_w;
                }
            }
            if target != size {
                tree.force_size(child, target.width, target.height);
            }
        }
        self.reposition_children(tree, id);
    }

    fn map(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        for child in tree.children(id) {
            tree.map(child);
        }
        tree.ensure_focus_chain(id);
    }

    fn place(&mut self, tree: &mut WidgetTree, id: WidgetId, x: i32, y: i32) {
        let Some(old) = tree.base(id).map(|base| base.position()) else {
            return;
        };
        tree.set_position(id, x, y);
        let (dx, dy) = (x - old.x, y - old.y);
        if dx == 0 && dy == 0 {
            return;
        }
        for child in tree.children(id) {
            if let Some(position) = tree.base(child).map(|base| base.position()) {
                tree.place(child, position.x + dx, position.y + dy);
            }
        }
    }

    fn confirm_size(&mut self, tree: &mut WidgetTree, id: WidgetId, width: i32, height: i32) -> bool {
        self.negotiate(tree, id, width, height)
    }

    fn size_changed(&mut self, tree: &mut WidgetTree, id: WidgetId, old: Size) {
        self.apply_size_change(tree, id, old);
    }

    fn draw(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let children = Self::visible_children(tree, id);
        for &child in &children {
            tree.draw(child);
        }

        let Some(base) = tree.base(id) else {
            return;
        };
        let border = base.has_border();
        let width = base.width;
        let title_role = if base.has_flag(WidgetFlags::URGENT) {
            ColorRole::Urgent
        } else if base.has_focus() {
            ColorRole::Title
        } else {
            ColorRole::TitleDim
        };
        let normal = tree.style(ColorRole::Normal);
        let title_style = tree.style(title_role);
        if let Some(surface) = tree.surface_mut(id) {
            surface.clear(normal);
            if border {
                surface.draw_border(normal);
                if let Some(title) = &self.title {
                    let text = format!(" {title} ");
                    let len = text.graphemes(true).count() as i32;
                    let x = ((width - len) / 2).max(1);
                    surface.put_str(x, 0, &text, title_style);
                }
            }
        }
        for &child in &children {
            tree.blit_child(id, child);
        }
    }

    fn key_pressed(&mut self, tree: &mut WidgetTree, id: WidgetId, key: &[u8]) -> bool {
        if let Some(active) = tree.active(id)
            && tree.key_pressed(active, key)
        {
            return true;
        }
        tree.perform_key(id, key)
    }

    fn clicked(&mut self, tree: &mut WidgetTree, id: WidgetId, event: MouseEvent, x: i32, y: i32) -> bool {
        let point = Point::new(x, y);
        let hit = Self::visible_children(tree, id)
            .into_iter()
            .find(|&child| tree.base(child).is_some_and(|base| base.geometry().contains(point)));
        let Some(child) = hit else {
            return false;
        };
        if event.is_press() && tree.base(child).is_some_and(|base| base.can_take_focus()) {
            let root = tree.root_of(id);
            tree.give_focus_to_child(root, child);
        }
        tree.clicked(child, event, x, y)
    }

    fn gained_focus(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        if let Some(active) = tree.active(id) {
            tree.set_focus(active, true);
        }
    }

    fn lost_focus(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        if let Some(active) = tree.active(id) {
            tree.set_focus(active, false);
        }
    }
}

impl WidgetTree {
    /// Step focus within the root box that contains `id`.
    pub fn focus_step(&mut self, id: WidgetId, direction: FocusDirection) -> bool {
        let root = self.root_of(id);
        self.move_focus(root, direction)
    }
}
