//! The window manager.
//!
//! [`WindowManager`] owns the widget tree and places every top-level widget
//! it manages into a [`Workspace`], tracking stacking order, focus history,
//! popup menus and the modal RESIZE/MOVE/WAIT_ON_CHILD states.
//!
//! ```
//! use tessera::Toolkit;
//! use tessera::wm::WindowManager;
//! use tessera_render::Size;
//!
//! let mut wm = WindowManager::new(Toolkit::default(), Size::new(80, 24));
//! let window = wm.tree_mut().new_window("Hello");
//! let label = wm.tree_mut().new_label("world");
//! wm.tree_mut().add_widget(window, label).unwrap();
//! wm.new_window(window).unwrap();
//!
//! assert_eq!(wm.focused_window(), Some(window));
//! // a-m starts moving the focused window.
//! wm.process_input(b"\x1bm");
//! assert!(!wm.mode().is_normal());
//! ```

mod actions;
mod input;
mod manager;
mod mode;
mod node;
mod render;
mod workspace;

pub use manager::{PopupMenu, WindowManager, WmSignals};
pub use mode::InputMode;
pub use node::{Node, NodeId};
pub use workspace::{Workspace, WorkspaceId};
