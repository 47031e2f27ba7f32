//! One-shot timer queue driven by host-supplied time.
//!
//! Gallery components have no event loop of their own. Debounced relayouts
//! and delayed menu cleanup are scheduled here, and the host advances the
//! queue by calling [`TimerQueue::process_expired`] with the current
//! [`Instant`] (typically once per frame or from its own timer callback).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
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
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages pending one-shot timers.
///
/// Stopped timers are dropped from the table immediately and their heap
/// entries are discarded lazily when they reach the front of the queue.
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Fire time of every pending timer.
    timers: SlotMap<TimerId, Instant>,
    /// Priority queue of pending timer fires.
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerQueue {
    /// Create an empty timer queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        let fire_time = now + duration;
        let id = self.timers.insert(fire_time);
        self.queue.push(TimerQueueEntry { id, fire_time });
        tracing::trace!(target: "photowall_core::timer", ?id, ?duration, "timer started");
        id
    }

    /// Stop a pending timer.
    ///
    /// Returns an error if the timer already fired or was stopped before.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        self.timers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TimerError::InvalidTimerId.into())
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Remove and return every timer whose fire time is at or before `now`,
    /// in firing order.
    #[tracing::instrument(skip(self), target = "photowall_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            // Stopped timers leave their heap entry behind.
            if self.timers.remove(entry.id).is_some() {
                tracing::trace!(target: "photowall_core::timer", id = ?entry.id, "timer fired");
                fired.push(entry.id);
            }
        }

        fired
    }

    fn discard_stale(&mut self) {
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
        let mut timers = TimerQueue::new();
        let start = Instant::now();
        let id = timers.start_one_shot(start, Duration::from_millis(50));

        assert!(timers.is_active(id));
        assert!(timers.process_expired(start + Duration::from_millis(49)).is_empty());
        assert_eq!(timers.process_expired(start + Duration::from_millis(50)), vec![id]);
        assert!(!timers.is_active(id));
        assert!(timers.process_expired(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let start = Instant::now();
        let late = timers.start_one_shot(start, Duration::from_millis(200));
        let early = timers.start_one_shot(start, Duration::from_millis(100));

        let fired = timers.process_expired(start + Duration::from_millis(300));
        assert_eq!(fired, vec![early, late]);
    }

    #[test]
    fn test_stop_prevents_fire() {
        let mut timers = TimerQueue::new();
        let start = Instant::now();
        let id = timers.start_one_shot(start, Duration::from_millis(10));

        assert!(timers.stop(id).is_ok());
        assert_eq!(
            timers.stop(id),
            Err(crate::CoreError::Timer(TimerError::InvalidTimerId))
        );
        assert!(timers.process_expired(start + Duration::from_millis(20)).is_empty());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let mut timers = TimerQueue::new();
        let start = Instant::now();
        let first = timers.start_one_shot(start, Duration::from_millis(10));
        timers.start_one_shot(start, Duration::from_millis(30));
        timers.stop(first).unwrap();

        assert_eq!(timers.time_until_next(start), Some(Duration::from_millis(30)));
        assert_eq!(
            timers.time_until_next(start + Duration::from_millis(40)),
            Some(Duration::ZERO)
        );
    }
}
