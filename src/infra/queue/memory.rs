//! In-memory delayed queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::{PollError, UnitQueue};
use crate::util::clock::{Clock, SystemClock};

/// Wrapper ordering units by due time (earliest first) and FIFO within the
/// same due time.
struct DelayedUnit<U> {
    due_at_ms: u128,
    seq: u64,
    unit: U,
}

impl<U> PartialEq for DelayedUnit<U> {
    fn eq(&self, other: &Self) -> bool {
        self.due_at_ms == other.due_at_ms && self.seq == other.seq
    }
}

impl<U> Eq for DelayedUnit<U> {}

impl<U> PartialOrd for DelayedUnit<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<U> Ord for DelayedUnit<U> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap: earliest due, then lowest sequence, on top.
        other
            .due_at_ms
            .cmp(&self.due_at_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Inner<U> {
    heap: BinaryHeap<DelayedUnit<U>>,
    next_seq: u64,
}

/// Bounded queue of units that become runnable after a delay.
pub struct DelayQueue<U> {
    max_depth: usize,
    clock: Box<dyn Clock>,
    inner: Mutex<Inner<U>>,
}

impl<U> DelayQueue<U> {
    /// Create a queue on the system clock.
    pub fn new(max_depth: usize) -> Self {
        Self::with_clock(max_depth, SystemClock)
    }

    /// Create a queue measuring delays against `clock`.
    pub fn with_clock(max_depth: usize, clock: impl Clock + 'static) -> Self {
        Self {
            max_depth,
            clock: Box::new(clock),
            inner: Mutex::new(Inner {
                heap: BinaryHeap::with_capacity(max_depth.min(1024)),
                next_seq: 0,
            }),
        }
    }

    /// Insert a unit that becomes due at an absolute time.
    pub fn push_at(&self, unit: U, due_at_ms: u128) -> Result<(), PollError> {
        let mut inner = self.inner.lock();
        if inner.heap.len() >= self.max_depth {
            return Err(PollError::Enqueue("max queue depth reached".into()));
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.heap.push(DelayedUnit {
            due_at_ms,
            seq,
            unit,
        });
        Ok(())
    }

    /// Pop the earliest unit if it is due at `now_ms`.
    pub fn pop_due(&self, now_ms: u128) -> Option<U> {
        let mut inner = self.inner.lock();
        if inner.heap.peek().is_some_and(|d| d.due_at_ms <= now_ms) {
            inner.heap.pop().map(|d| d.unit)
        } else {
            None
        }
    }

    /// Pop every unit due at `now_ms`, in due order.
    pub fn drain_due(&self, now_ms: u128) -> Vec<U> {
        let mut inner = self.inner.lock();
        let mut due = Vec::new();
        while inner.heap.peek().is_some_and(|d| d.due_at_ms <= now_ms) {
            if let Some(d) = inner.heap.pop() {
                due.push(d.unit);
            }
        }
        due
    }

    /// Due time of the earliest unit.
    pub fn next_due_ms(&self) -> Option<u128> {
        self.inner.lock().heap.peek().map(|d| d.due_at_ms)
    }

    /// Current time on the queue's clock.
    pub fn now_ms(&self) -> u128 {
        self.clock.now_ms()
    }

    /// Maximum depth allowed for this queue.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.inner.lock().heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<U> UnitQueue<U> for DelayQueue<U> {
    fn submit(&self, unit: U, delay: Duration) -> Result<(), PollError> {
        let due_at_ms = self.clock.now_ms() + delay.as_millis();
        tracing::debug!(%due_at_ms, "unit submitted");
        self.push_at(unit, due_at_ms)
    }
}
