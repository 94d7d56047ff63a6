//! Timer system for Horizon Tessera.
//!
//! One-shot and repeating timers kept in a min-heap ordered by deadline. The
//! event loop uses [`TimerManager::time_until_next`] as its blocking timeout
//! and turns expired timers into [`TesseraEvent::Timer`] events.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::event::TesseraEvent;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

#[derive(Debug)]
struct TimerData {
    interval: Duration,
    kind: TimerKind,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap.
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages all timers owned by an event loop.
#[derive(Debug, Default)]
pub struct TimerManager {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires after `duration`.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        self.start(duration, TimerKind::OneShot)
    }

    /// Start a repeating timer. The first fire occurs after `interval`.
    pub fn start_repeating(&mut self, interval: Duration) -> TimerId {
        self.start(interval, TimerKind::Repeating)
    }

    fn start(&mut self, interval: Duration, kind: TimerKind) -> TimerId {
        let id = self.timers.insert(TimerData { interval, kind });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: Instant::now() + interval,
        });
        tracing::trace!(target: targets::EVENT_LOOP, ?id, ?kind, ?interval, "timer started");
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => Ok(()),
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Get the duration until the next timer fires, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.discard_stopped();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(Instant::now()))
    }

    /// Process all timers whose deadline has passed.
    pub fn process_expired(&mut self) -> Vec<TesseraEvent> {
        self.process_expired_at(Instant::now())
    }

    /// Process all timers whose deadline is at or before `now`.
    pub fn process_expired_at(&mut self, now: Instant) -> Vec<TesseraEvent> {
        let mut events = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            let id = entry.id;
            let Some(timer) = self.timers.get(id) else {
                continue;
            };

            tracing::trace!(target: targets::EVENT_LOOP, ?id, "timer fired");
            events.push(TesseraEvent::Timer { id });

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(id);
                }
                TimerKind::Repeating => {
                    let fire_time = now + timer.interval;
                    self.queue.push(TimerQueueEntry { id, fire_time });
                }
            }
        }

        events
    }

    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerManager::new();
        let id = timers.start_one_shot(Duration::from_millis(5));
        assert!(timers.is_active(id));

        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(timers.process_expired_at(later), vec![TesseraEvent::Timer { id }]);
        assert!(!timers.is_active(id));
        assert!(timers.process_expired_at(later).is_empty());
    }

    #[test]
    fn test_repeating_reschedules() {
        let mut timers = TimerManager::new();
        let id = timers.start_repeating(Duration::from_millis(10));

        let first = Instant::now() + Duration::from_millis(20);
        assert_eq!(timers.process_expired_at(first).len(), 1);
        assert!(timers.is_active(id));
        assert_eq!(timers.process_expired_at(first + Duration::from_millis(10)).len(), 1);
    }

    #[test]
    fn test_stop_timer() {
        let mut timers = TimerManager::new();
        let id = timers.start_one_shot(Duration::from_millis(1));
        assert!(timers.stop(id).is_ok());
        assert!(timers.stop(id).is_err());
        assert_eq!(timers.time_until_next(), None);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_time_until_next_orders_by_deadline() {
        let mut timers = TimerManager::new();
        timers.start_one_shot(Duration::from_secs(60));
        timers.start_one_shot(Duration::from_millis(50));
        let next = timers.time_until_next().unwrap_or(Duration::MAX);
        assert!(next <= Duration::from_millis(50));
    }
}
