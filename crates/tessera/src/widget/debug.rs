//! Text rendering of widget hierarchies for diagnostics.

use tessera_core::{Result, TesseraError, TreeFormatOptions};

use super::tree::WidgetTree;
use super::WidgetId;

/// Formats a widget hierarchy as an indented tree.
///
/// ```text
/// Window "chat" [WidgetId(1v1)] (Window)
/// ├── Box [WidgetId(2v1)] (Box)
/// │  └── Label [WidgetId(3v1)] (Label)
/// └── Label [WidgetId(4v1)] (Label)
/// ```
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every root widget and its descendants.
    pub fn format_all(&self, tree: &WidgetTree) -> String {
        let mut roots: Vec<WidgetId> = tree.ids().filter(|&id| tree.parent(id).is_none()).collect();
        roots.sort();
        let mut output = format!("Widget Tree ({} total widgets):\n", tree.len());
        if roots.is_empty() {
            output.push_str("  (empty)\n");
        }
        for root in roots {
            self.format_into(tree, root, 0, true, &mut output);
        }
        output
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, tree: &WidgetTree, root: WidgetId) -> Result<String> {
        if !tree.contains(root) {
            return Err(TesseraError::InvalidWidget);
        }
        let mut output = String::new();
        self.format_into(tree, root, 0, true, &mut output);
        Ok(output)
    }

    fn format_into(&self, tree: &WidgetTree, id: WidgetId, depth: usize, is_last: bool, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(base) = tree.base(id) else {
            return;
        };
        let kind = tree.kind_name(id).unwrap_or("?");

        output.push_str(&self.options.prefix(depth, is_last));
        output.push_str(kind);
        if let Some(title) = tree.box_ref(id).and_then(|boxed| boxed.title()) {
            output.push_str(&format!(" \"{title}\""));
        } else if let Some(name) = base.name() {
            output.push_str(&format!(" \"{name}\""));
        }
        if self.options.show_ids {
            output.push_str(&format!(" [{id:?}]"));
        }
        if self.options.show_kinds {
            output.push_str(&format!(" ({kind})"));
        }
        if self.options.show_geometry {
            let g = base.geometry();
            output.push_str(&format!(" @({}, {}) {}x{}", g.left(), g.top(), g.width(), g.height()));
        }
        if !base.is_visible() {
            output.push_str(" hidden");
        }
        output.push('\n');

        let children = base.children();
        let count = children.len();
        for (index, &child) in children.iter().enumerate() {
            self.format_into(tree, child, depth + 1, index + 1 == count, output);
        }
    }
}
