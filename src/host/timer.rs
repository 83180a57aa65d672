use std::collections::BTreeMap;
use tracing::debug;

use super::{Scheduler, TimerHandle};

/// One-shot timers against a millisecond clock the owner advances.
///
/// Tests drive the clock with [`TimerQueue::advance_to_next`]; the terminal
/// runtime sets it from a real `Instant` before draining due timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<TimerHandle, u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Moves the clock forward. The clock never runs backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest deadline, ties broken by scheduling order.
    pub fn next_deadline(&self) -> Option<(TimerHandle, u64)> {
        self.pending
            .iter()
            .min_by_key(|(handle, deadline)| (**deadline, **handle))
            .map(|(handle, deadline)| (*handle, *deadline))
    }

    /// Removes and returns the earliest timer whose deadline has passed.
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        let (handle, deadline) = self.next_deadline()?;
        if deadline > self.now_ms {
            return None;
        }
        self.pending.remove(&handle);
        Some(handle)
    }

    /// Jumps the clock to the earliest deadline and fires that timer.
    pub fn advance_to_next(&mut self) -> Option<TimerHandle> {
        let (_, deadline) = self.next_deadline()?;
        self.set_now(deadline);
        self.pop_due()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay_ms: u32) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let deadline = self.now_ms + u64::from(delay_ms);
        self.pending.insert(handle, deadline);
        debug!("Scheduled {} for t={}ms", handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.pending.remove(&handle).is_some();
        if removed {
            debug!("Cancelled {}", handle);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let slow = timers.schedule_once(500);
        let fast = timers.schedule_once(100);

        assert_eq!(timers.advance_to_next(), Some(fast));
        assert_eq!(timers.now_ms(), 100);
        assert_eq!(timers.advance_to_next(), Some(slow));
        assert_eq!(timers.now_ms(), 500);
        assert_eq!(timers.advance_to_next(), None);
    }

    #[test]
    fn test_pop_due_respects_clock() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule_once(250);

        timers.set_now(249);
        assert_eq!(timers.pop_due(), None);

        timers.set_now(250);
        assert_eq!(timers.pop_due(), Some(handle));
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule_once(10);

        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert_eq!(timers.advance_to_next(), None);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut timers = TimerQueue::new();
        timers.set_now(1_000);
        timers.set_now(10);
        assert_eq!(timers.now_ms(), 1_000);

        let handle = timers.schedule_once(5);
        assert_eq!(timers.next_deadline(), Some((handle, 1_005)));
    }
}
