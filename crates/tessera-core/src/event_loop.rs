//! The single-threaded event loop.
//!
//! Everything the toolkit reacts to (terminal bytes, mouse reports, resizes,
//! timers, child-process exits) arrives here as a [`TesseraEvent`]. Producer
//! threads hold an [`EventSender`]; the loop owns the receiving end, a
//! priority queue and the [`TimerManager`], and blocks in exactly one place
//! between events.
//!
//! # Example
//!
//! ```
//! use tessera_core::{ControlFlow, EventLoop, TesseraEvent};
//!
//! let mut event_loop = EventLoop::new();
//! let sender = event_loop.sender();
//! sender.send(TesseraEvent::Input(b"q".to_vec())).unwrap();
//!
//! let mut seen = Vec::new();
//! event_loop
//!     .run(|_, event| {
//!         seen.push(event);
//!         ControlFlow::Exit
//!     })
//!     .unwrap();
//! assert_eq!(seen, vec![TesseraEvent::Input(b"q".to_vec())]);
//! ```

use std::collections::BinaryHeap;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::error::{Result, TesseraError};
use crate::event::{PrioritizedEvent, TesseraEvent};
use crate::logging::{span_names, targets};
use crate::timer::{TimerId, TimerManager};

/// Whether the loop should keep running after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep waiting for events.
    Continue,
    /// Leave [`EventLoop::run`].
    Exit,
}

/// A cloneable handle for posting events into an [`EventLoop`] from any
/// thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: Sender<TesseraEvent>,
}

static_assertions::assert_impl_all!(EventSender: Send, Sync);

impl EventSender {
    /// Post an event. Fails once the loop has been dropped.
    pub fn send(&self, event: TesseraEvent) -> Result<()> {
        self.inner
            .send(event)
            .map_err(|_| TesseraError::EventLoopExited)
    }
}

/// The event loop.
pub struct EventLoop {
    sender: Sender<TesseraEvent>,
    receiver: Receiver<TesseraEvent>,
    queue: BinaryHeap<PrioritizedEvent>,
    sequence: u64,
    timers: TimerManager,
    exited: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create a new, empty event loop.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            queue: BinaryHeap::new(),
            sequence: 0,
            timers: TimerManager::new(),
            exited: false,
        }
    }

    /// Get a handle that producer threads use to post events.
    pub fn sender(&self) -> EventSender {
        EventSender {
            inner: self.sender.clone(),
        }
    }

    /// Queue an event from the loop's own thread.
    pub fn post(&mut self, event: TesseraEvent) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.queue.push(PrioritizedEvent::new(event, sequence));
    }

    /// Start a one-shot timer.
    pub fn start_timer(&mut self, duration: Duration) -> TimerId {
        self.timers.start_one_shot(duration)
    }

    /// Start a repeating timer.
    pub fn start_repeating_timer(&mut self, interval: Duration) -> TimerId {
        self.timers.start_repeating(interval)
    }

    /// Stop a timer.
    pub fn stop_timer(&mut self, id: TimerId) -> Result<()> {
        self.timers.stop(id)
    }

    /// Check if a timer is still pending.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    /// Whether [`run`](Self::run) has returned because of `Quit` or `Exit`.
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Wait for the next event.
    ///
    /// Blocks until an event is posted, a timer expires, or `timeout`
    /// elapses (`None` waits indefinitely, `Some(Duration::ZERO)` polls).
    /// Returns `None` only on timeout.
    pub fn next_event(&mut self, timeout: Option<Duration>) -> Option<TesseraEvent> {
        self.collect_ready();
        if let Some(next) = self.queue.pop() {
            return Some(next.event);
        }

        let wait = match (timeout, self.timers.time_until_next()) {
            (Some(t), Some(d)) => Some(t.min(d)),
            (t, d) => t.or(d),
        };

        let received = match wait {
            Some(wait) => match self.receiver.recv_timeout(wait) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) => None,
                // We hold a sender, so the channel never disconnects.
                Err(RecvTimeoutError::Disconnected) => None,
            },
            None => self.receiver.recv().ok(),
        };
        if let Some(event) = received {
            self.post(event);
        }

        self.collect_ready();
        self.queue.pop().map(|next| next.event)
    }

    /// Run until a `Quit` event arrives or `handler` returns
    /// [`ControlFlow::Exit`].
    ///
    /// The handler receives the loop itself so it can start and stop timers
    /// or post follow-up events.
    pub fn run<F>(&mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(&mut EventLoop, TesseraEvent) -> ControlFlow,
    {
        if self.exited {
            return Err(TesseraError::EventLoopExited);
        }
        let _span = tracing::debug_span!(target: targets::EVENT_LOOP, span_names::EVENT_LOOP).entered();
        tracing::debug!(target: targets::EVENT_LOOP, "event loop started");

        loop {
            let Some(event) = self.next_event(None) else {
                continue;
            };
            if event == TesseraEvent::Quit {
                tracing::debug!(target: targets::EVENT_LOOP, "quit requested");
                break;
            }
            tracing::trace!(target: targets::EVENT_LOOP, ?event, "dispatching event");
            if handler(self, event) == ControlFlow::Exit {
                break;
            }
        }

        self.exited = true;
        tracing::debug!(target: targets::EVENT_LOOP, "event loop exited");
        Ok(())
    }

    fn collect_ready(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            self.post(event);
        }
        for event in self.timers.process_expired() {
            self.post(event);
        }
    }
}
