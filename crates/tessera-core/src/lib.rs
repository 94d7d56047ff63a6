//! Core systems for Horizon Tessera.
//!
//! This crate carries the pieces of the toolkit that know nothing about
//! widgets or terminals:
//!
//! - [`EventLoop`] - the single blocking wait between events
//! - [`Signal`] and [`VetoSignal`] - observer notification and confirmation hooks
//! - [`TimerManager`] - one-shot and repeating timers
//! - [`TesseraError`] - the shared error type
//! - [`logging`] - tracing targets and tree-dump formatting options

pub mod error;
pub mod event;
pub mod event_loop;
pub mod logging;
pub mod signal;
pub mod timer;

pub use error::{Result, TesseraError, TimerError};
pub use event::{EventPriority, MouseEvent, TesseraEvent};
pub use event_loop::{ControlFlow, EventLoop, EventSender};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionGuard, ConnectionId, Signal, VetoSignal};
pub use timer::{TimerId, TimerKind, TimerManager};
