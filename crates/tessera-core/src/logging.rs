//! Logging and debugging facilities for Horizon Tessera.
//!
//! Horizon Tessera uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. Applications choose how logs are collected;
//! since the terminal is owned by the window manager, writing to a file is
//! the usual choice:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! let file = std::fs::File::create("tessera.log")?;
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::new("tessera::wm=debug,tessera::bindings=warn"))
//!     .with_writer(file)
//!     .init();
//! ```
//!
//! The target constants in [`targets`] match the targets used by every
//! `tracing` call in the workspace, so they can be used directly in filter
//! directives.

/// Span names used throughout Horizon Tessera for tracing.
pub mod span_names {
    /// Event loop processing span.
    pub const EVENT_LOOP: &str = "tessera::event_loop";
    /// Input dispatch span (one per decoded key).
    pub const DISPATCH: &str = "tessera::dispatch";
    /// Layout negotiation span.
    pub const LAYOUT: &str = "tessera::layout";
}

/// Target names for log filtering.
pub mod targets {
    /// Key recognizer and key name tables.
    pub const KEYS: &str = "tessera::keys";
    /// Action and binding registries.
    pub const BINDINGS: &str = "tessera::bindings";
    /// Box measurement and resize negotiation.
    pub const LAYOUT: &str = "tessera::layout";
    /// Focus chain traversal.
    pub const FOCUS: &str = "tessera::focus";
    /// Widget lifecycle (map, draw, destroy).
    pub const WIDGET: &str = "tessera::widget";
    /// Window manager state machine.
    pub const WM: &str = "tessera::wm";
    /// Event loop and timers.
    pub const EVENT_LOOP: &str = "tessera::event_loop";
    /// Signal emission.
    pub const SIGNAL: &str = "tessera::signal";
    /// Style and configuration loading.
    pub const STYLE: &str = "tessera::style";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

impl TreeStyle {
    /// The `(branch, tee, corner)` strings used to draw a tree level.
    pub fn glyphs(self) -> (&'static str, &'static str, &'static str) {
        match self {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        }
    }
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show widget IDs.
    pub show_ids: bool,
    /// Whether to show kind names.
    pub show_kinds: bool,
    /// Whether to show geometry.
    pub show_geometry: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_kinds: true,
            show_geometry: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_geometry: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_kinds: false,
            show_geometry: false,
            ..Default::default()
        }
    }

    /// Build the prefix string for a tree node at `depth`.
    pub fn prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = self.style.glyphs();
        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing layout passes and full redraws.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "tessera::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_root_is_empty() {
        let options = TreeFormatOptions::default();
        assert_eq!(options.prefix(0, true), "");
    }

    #[test]
    fn test_prefix_ascii_levels() {
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        };
        assert_eq!(options.prefix(1, false), "+-- ");
        assert_eq!(options.prefix(1, true), "`-- ");
        assert_eq!(options.prefix(2, true), "|  `-- ");
    }

    #[test]
    fn test_minimal_options() {
        let options = TreeFormatOptions::minimal();
        assert!(!options.show_ids);
        assert!(!options.show_kinds);
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
