//! Prelude module for Horizon Tessera.
//!
//! ```ignore
//! use tessera::prelude::*;
//! ```
//!
//! This provides access to:
//! - Toolkit lifecycle and configuration (`Toolkit`, `StyleConfig`)
//! - The widget tree and built-in widgets (`WidgetTree`, `BoxWidget`, `Label`)
//! - The window manager and runtime (`WindowManager`, `Runtime`)
//! - Geometry and backends (`Point`, `Size`, `Rect`, `MemoryBackend`)

// ============================================================================
// Toolkit and Events
// ============================================================================

pub use crate::Toolkit;
pub use tessera_core::{ControlFlow, MouseEvent, Result, Signal, TesseraError, TesseraEvent, VetoSignal};
pub use tessera_style::{ColorRole, StyleConfig};

// ============================================================================
// Bindings
// ============================================================================

pub use crate::binding::{ActionCallback, ActionParam, KindBuilder, KindId};
pub use crate::key::KeyNames;

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::{
    Alignment, BoxWidget, FocusDirection, Label, Widget, WidgetFlags, WidgetId, WidgetTree, Window,
};

// ============================================================================
// Window Manager
// ============================================================================

pub use crate::runtime::Runtime;
pub use crate::wm::{InputMode, WindowManager};

// ============================================================================
// Rendering
// ============================================================================

pub use tessera_render::{AnsiBackend, Backend, MemoryBackend, Point, Rect, Size, Surface};
