//! Per-window bookkeeping.

use slotmap::new_key_type;

use crate::widget::WidgetId;

use super::workspace::WorkspaceId;

new_key_type! {
    /// Identifier of a managed window.
    pub struct NodeId;
}

/// A top-level widget under window-manager control.
///
/// The widget keeps its own surface; the node records where it lives and how
/// it stacks. `workspace` is a back-reference by id, never an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) widget: WidgetId,
    pub(crate) workspace: WorkspaceId,
    pub(crate) layer: u64,
    pub(crate) scroll: i32,
}

impl Node {
    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    /// Stacking order; higher layers are drawn later.
    pub fn layer(&self) -> u64 {
        self.layer
    }

    /// Rows of the window content scrolled off the top.
    pub fn scroll(&self) -> i32 {
        self.scroll
    }
}
