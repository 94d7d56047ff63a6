//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while pushing cells to a terminal.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Invalid surface dimensions (negative width or height).
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
