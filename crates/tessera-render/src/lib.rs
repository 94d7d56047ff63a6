//! Cell surfaces and the terminal backend boundary for Horizon Tessera.
//!
//! - [`Point`], [`Size`], [`Rect`] - integer cell geometry
//! - [`Cell`], [`CellStyle`], [`Color`] - what a terminal cell holds
//! - [`Surface`] - off-screen cell grids owned by widgets and the screen
//! - [`Backend`] - where composed frames go

mod backend;
mod cell;
mod error;
mod surface;
mod types;

pub use backend::{AnsiBackend, Backend, MemoryBackend};
pub use cell::{Cell, CellStyle, Color};
pub use error::{RenderError, RenderResult};
pub use surface::Surface;
pub use types::{Point, Rect, Size};
