//! State shared by every widget, kept by the tree outside the widget value.

use tessera_render::{Point, Rect, Size, Surface};

use super::flags::WidgetFlags;
use super::WidgetId;
use crate::binding::KindId;

/// Geometry, flags and tree links of one widget.
///
/// A size of zero in either dimension means the widget is unsized. Positions
/// are absolute screen cells.
#[derive(Debug)]
pub struct WidgetBase {
    pub(crate) kind: KindId,
    pub(crate) name: Option<String>,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) min_width: i32,
    pub(crate) min_height: i32,
    pub(crate) flags: WidgetFlags,
    pub(crate) surface: Option<Surface>,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) positioned: bool,
}

impl WidgetBase {
    pub(crate) fn new(kind: KindId, flags: WidgetFlags) -> Self {
        Self {
            kind,
            name: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            min_width: 1,
            min_height: 1,
            flags,
            surface: None,
            parent: None,
            children: Vec::new(),
            positioned: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> KindId {
        self.kind
    }

    /// The widget's name, used by workspace placement rules.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn geometry(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    #[inline]
    pub fn flags(&self) -> WidgetFlags {
        self.flags
    }

    #[inline]
    pub fn has_flag(&self, flag: WidgetFlags) -> bool {
        self.flags.has(flag)
    }

    /// Whether the widget has no size yet.
    pub fn is_unsized(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn is_visible(&self) -> bool {
        !self.flags.has(WidgetFlags::INVISIBLE)
    }

    pub fn is_mapped(&self) -> bool {
        self.flags.has(WidgetFlags::MAPPED)
    }

    pub fn can_take_focus(&self) -> bool {
        self.flags.has(WidgetFlags::CAN_TAKE_FOCUS)
    }

    pub fn has_focus(&self) -> bool {
        self.flags.has(WidgetFlags::HAS_FOCUS)
    }

    pub fn has_border(&self) -> bool {
        !self.flags.has(WidgetFlags::NO_BORDER)
    }

    /// Whether the widget has been placed explicitly.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// The widget's drawing surface, present once mapped.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}
