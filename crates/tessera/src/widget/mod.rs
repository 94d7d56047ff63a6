//! Widgets, boxes and their layout and focus machinery.
//!
//! - [`WidgetTree`] - the arena owning every widget
//! - [`Widget`] - the hook table a widget kind implements
//! - [`WidgetBase`] - geometry, flags and tree links
//! - [`BoxWidget`] - the container with resize negotiation and focus chains
//! - [`Window`], [`Label`] - the other built-in kinds
//!
//! # Example
//!
//! ```
//! use tessera::Toolkit;
//! use tessera::widget::WidgetTree;
//!
//! let mut tree = WidgetTree::new(Toolkit::default());
//! let vbox = tree.new_box(true, false);
//! for text in ["one", "three"] {
//!     let label = tree.new_label(text);
//!     tree.add_widget(vbox, label).unwrap();
//! }
//! tree.measure(vbox);
//! assert_eq!(tree.base(vbox).unwrap().size().width, 5);
//! assert_eq!(tree.base(vbox).unwrap().size().height, 2);
//! ```

mod base;
mod box_widget;
mod debug;
mod flags;
mod focus;
mod kinds;
mod label;
mod traits;
mod tree;
mod window;


use slotmap::new_key_type;

pub use base::WidgetBase;
pub use box_widget::{Alignment, BoxWidget};
pub use debug::WidgetTreeDebug;
pub use flags::WidgetFlags;
pub use focus::{FocusChain, FocusDirection};
pub use kinds::BuiltinKinds;
pub use label::Label;
pub use traits::{AsAny, Widget};
pub use tree::{TreeRequest, WidgetTree};
pub use window::Window;

new_key_type! {
    /// Identifies a widget within a [`WidgetTree`].
    pub struct WidgetId;
}
