//! One-shot cancellable timers driven by an external event loop.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

/// Cancellation token for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Deadline-ordered queue of pending one-shot timers.
///
/// Cancelled timers leave a stale heap entry behind; it is skipped when it
/// reaches the front.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<(Instant, u64)>>,
    pending: HashMap<u64, T>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pending: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, payload: T) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((deadline, seq)));
        self.pending.insert(seq, payload);
        TimerToken(seq)
    }

    /// Cancel a pending timer, returning its payload if it had not fired.
    pub fn cancel(&mut self, token: TimerToken) -> Option<T> {
        self.pending.remove(&token.0)
    }

    /// Pop the next timer whose deadline is at or before `now`.
    ///
    /// Timers with equal deadlines fire in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        while let Some(&Reverse((deadline, seq))) = self.heap.peek() {
            if deadline > now {
                return None;
            }
            self.heap.pop();
            if let Some(payload) = self.pending.remove(&seq) {
                return Some(payload);
            }
        }
        None
    }

    /// Earliest deadline among live timers.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(&Reverse((deadline, seq))) = self.heap.peek() {
            if self.pending.contains_key(&seq) {
                return Some(deadline);
            }
            self.heap.pop();
        }
        None
    }

    /// Number of live (scheduled, not cancelled, not fired) timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
