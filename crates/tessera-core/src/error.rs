//! Error types for Horizon Tessera.

/// The main error type for Horizon Tessera operations.
///
/// Most negative outcomes in the toolkit (a vetoed close, a rejected resize,
/// an unknown action name in a binding) are ordinary boolean results. This
/// type covers API misuse and runtime failures that callers must handle.
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    /// The event loop has already exited and cannot accept events.
    #[error("The event loop has already exited")]
    EventLoopExited,
    /// Timer-related error.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),
    /// The widget ID is invalid or the widget has been destroyed.
    #[error("Invalid or destroyed widget ID")]
    InvalidWidget,
    /// The widget exists but is not a container.
    #[error("Widget is not a container")]
    NotAContainer,
    /// Attempted to add a widget into itself or one of its descendants.
    #[error("Cannot add a widget to itself or one of its descendants")]
    CircularParentage,
    /// The widget already belongs to a container.
    #[error("Widget already has a parent container")]
    AlreadyParented,
    /// The widget kind is not registered.
    #[error("Unknown widget kind '{0}'")]
    UnknownKind(String),
    /// A widget kind with this name has already been registered.
    #[error("Widget kind '{0}' is already registered")]
    DuplicateKind(String),
    /// The widget is not managed as a top-level window.
    #[error("Widget is not a managed window")]
    UnmanagedWindow,
    /// The workspace index does not exist.
    #[error("Workspace index {0} is out of range")]
    InvalidWorkspace(usize),
    /// I/O failure while talking to the terminal backend.
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
}

/// A specialized Result type for Horizon Tessera operations.
pub type Result<T> = std::result::Result<T, TesseraError>;
