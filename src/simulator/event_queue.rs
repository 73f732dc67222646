//! Event queue and simulation clock for the checkout simulator

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::ProcessId;

/// A pending resumption of a process.
///
/// Events are totally ordered by `(due_time, sequence)`. The sequence number is
/// handed out by the queue at push time, so two events due at the same instant
/// pop in the order they were scheduled.
#[derive(Debug, Clone, Copy)]
pub struct SimEvent {
    pub due_time: f64,
    pub sequence: u64,
    pub process: ProcessId,
}

impl PartialEq for SimEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for SimEvent {}
impl PartialOrd for SimEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SimEvent {
    // BinaryHeap is a max-heap, so the comparison is reversed to pop the earliest event first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_time
            .total_cmp(&self.due_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Stable priority queue of pending events
#[derive(Debug, Default)]
pub struct SimEventQueue {
    queue: BinaryHeap<SimEvent>,
    next_sequence: u64,
}

impl SimEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a resumption for `process` at `due_time`, returning its sequence number.
    pub fn push(&mut self, due_time: f64, process: ProcessId) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(SimEvent {
            due_time,
            sequence,
            process,
        });
        sequence
    }

    pub fn pop(&mut self) -> Option<SimEvent> {
        self.queue.pop()
    }

    /// Due time of the earliest pending event
    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|event| event.due_time)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Simulation clock
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    current_time: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.current_time
    }

    /// Move the clock forward to `time`. The clock never runs backwards.
    pub fn advance_to(&mut self, time: f64) {
        debug_assert!(time >= self.current_time, "clock moved backwards");
        if time > self.current_time {
            self.current_time = time;
        }
    }
}
