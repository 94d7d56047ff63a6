//! Event types for the Horizon Tessera event loop.

use crate::timer::TimerId;

/// Priority levels for queued events.
///
/// Higher priority events are processed first within the same loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventPriority {
    /// Lowest priority - wake-ups and housekeeping.
    Low = 0,
    /// Normal priority - resize notices, child-process notices.
    #[default]
    Normal = 1,
    /// High priority - user input, timers.
    High = 2,
    /// Critical priority - shutdown.
    Critical = 3,
}

/// Mouse actions reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEvent {
    /// Left button pressed.
    LeftDown,
    /// Middle button pressed.
    MiddleDown,
    /// Right button pressed.
    RightDown,
    /// Any button released.
    Up,
    /// Wheel scrolled up.
    ScrollUp,
    /// Wheel scrolled down.
    ScrollDown,
}

impl MouseEvent {
    /// Whether this is a button press (as opposed to release or wheel).
    pub fn is_press(self) -> bool {
        matches!(self, Self::LeftDown | Self::MiddleDown | Self::RightDown)
    }
}

/// Events dispatched through the Horizon Tessera event loop.
///
/// Producer threads (the terminal reader, the child-process watcher) send
/// these through an [`EventSender`](crate::EventSender); the loop hands them
/// to the application one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TesseraEvent {
    /// Raw bytes read from the terminal.
    Input(Vec<u8>),

    /// A decoded mouse report, in screen coordinates.
    Mouse {
        /// What happened.
        event: MouseEvent,
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// The terminal was resized.
    Resize {
        /// New width in cells.
        width: i32,
        /// New height in cells.
        height: i32,
    },

    /// A timer has fired.
    Timer {
        /// The timer that fired.
        id: TimerId,
    },

    /// A foreground child process exited.
    ChildExited {
        /// Process id of the child.
        pid: u32,
        /// Exit status reported by the watcher.
        status: i32,
    },

    /// Request to quit the loop.
    Quit,

    /// Wake up the loop without doing anything else.
    WakeUp,
}

static_assertions::assert_impl_all!(TesseraEvent: Send);

impl TesseraEvent {
    /// Get the priority of this event.
    pub fn priority(&self) -> EventPriority {
        match self {
            Self::Quit => EventPriority::Critical,
            Self::Input(_) | Self::Mouse { .. } | Self::Timer { .. } => EventPriority::High,
            Self::Resize { .. } | Self::ChildExited { .. } => EventPriority::Normal,
            Self::WakeUp => EventPriority::Low,
        }
    }
}

/// A wrapper for prioritized events used in the loop's internal queue.
#[derive(Debug)]
pub(crate) struct PrioritizedEvent {
    pub event: TesseraEvent,
    pub priority: EventPriority,
    /// Sequence number for stable ordering of same-priority events.
    pub sequence: u64,
}

impl PrioritizedEvent {
    pub fn new(event: TesseraEvent, sequence: u64) -> Self {
        let priority = event.priority();
        Self {
            event,
            priority,
            sequence,
        }
    }
}

impl PartialEq for PrioritizedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for PrioritizedEvent {}

impl PartialOrd for PrioritizedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrioritizedEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap: higher priority is greater, and within a
        // priority the older (lower sequence) event is greater.
        match self.priority.cmp(&other.priority) {
            std::cmp::Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_quit_outranks_input() {
        let mut heap = BinaryHeap::new();
        heap.push(PrioritizedEvent::new(TesseraEvent::Input(b"a".to_vec()), 0));
        heap.push(PrioritizedEvent::new(TesseraEvent::Quit, 1));
        assert_eq!(heap.pop().map(|e| e.event), Some(TesseraEvent::Quit));
    }

    #[test]
    fn test_same_priority_is_fifo() {
        let mut heap = BinaryHeap::new();
        heap.push(PrioritizedEvent::new(TesseraEvent::Input(b"1".to_vec()), 0));
        heap.push(PrioritizedEvent::new(TesseraEvent::Input(b"2".to_vec()), 1));
        assert_eq!(
            heap.pop().map(|e| e.event),
            Some(TesseraEvent::Input(b"1".to_vec()))
        );
    }

    #[test]
    fn test_mouse_is_press() {
        assert!(MouseEvent::LeftDown.is_press());
        assert!(!MouseEvent::Up.is_press());
        assert!(!MouseEvent::ScrollDown.is_press());
    }
}
