//! Horizon Tessera - a terminal widget toolkit with a built-in window manager.
//!
//! This is the main crate: key recognition and binding registries, the
//! widget tree with box layout negotiation and focus chains, the window
//! manager, and the runtime that drives them from an event loop.
//!
//! # Example
//!
//! ```
//! use tessera::prelude::*;
//!
//! let toolkit = Toolkit::init(StyleConfig::default());
//! let mut wm = WindowManager::new(toolkit, Size::new(80, 24));
//!
//! let window = wm.tree_mut().new_window("Greeting");
//! let body = wm.tree_mut().new_label("Hello from the terminal");
//! wm.tree_mut().add_widget(window, body).unwrap();
//! wm.new_window(window).unwrap();
//!
//! let screen = wm.render();
//! assert!(screen.lines().iter().any(|line| line.contains("Hello from the terminal")));
//! ```

pub use tessera_core::*;

pub mod binding;
pub mod key;
pub mod prelude;
pub mod runtime;
pub mod toolkit;
pub mod widget;
pub mod wm;

pub use toolkit::Toolkit;

/// Cell surfaces, geometry and terminal backends.
pub mod render {
    pub use tessera_render::*;
}

/// Configuration and color palettes.
pub mod style {
    pub use tessera_style::*;
}
