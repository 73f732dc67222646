// src/simulator/resource.rs - Capacity-limited server with a FIFO wait queue
use std::collections::VecDeque;

use crate::error::SimError;

use super::{ProcessId, ResourceId};

/// Outcome of a request against a [`Resource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// A slot was free and the requester now holds it.
    Granted,
    /// All slots are busy; the requester sits at `position` (0-based) in the wait queue.
    Queued { position: usize },
}

/// A shared server pool with `capacity` slots.
///
/// One line feeds every slot. Grants happen strictly in request order: a
/// released slot always goes to the head of the wait queue.
#[derive(Debug, Clone)]
pub struct Resource {
    id: ResourceId,
    capacity: usize,
    users: Vec<ProcessId>,
    wait_queue: VecDeque<ProcessId>,
    total_grants: u64,
}

impl Resource {
    pub fn new(id: ResourceId, capacity: usize) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::InvalidCapacity(capacity));
        }
        Ok(Self {
            id,
            capacity,
            users: Vec::with_capacity(capacity),
            wait_queue: VecDeque::new(),
            total_grants: 0,
        })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held
    pub fn in_use(&self) -> usize {
        self.users.len()
    }

    /// Number of requests waiting for a slot (holders excluded)
    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn total_grants(&self) -> u64 {
        self.total_grants
    }

    pub fn is_held_by(&self, process: ProcessId) -> bool {
        self.users.contains(&process)
    }

    /// Waiting processes, head of the line first
    pub fn waiting(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.wait_queue.iter().copied()
    }

    pub fn request(&mut self, process: ProcessId) -> Request {
        if self.users.len() < self.capacity {
            self.grant(process);
            Request::Granted
        } else {
            self.wait_queue.push_back(process);
            Request::Queued {
                position: self.wait_queue.len() - 1,
            }
        }
    }

    /// Give back the slot held by `process`.
    ///
    /// Returns the waiting process that was granted the freed slot, if any.
    pub fn release(&mut self, process: ProcessId) -> Result<Option<ProcessId>, SimError> {
        let index = self
            .users
            .iter()
            .position(|&user| user == process)
            .ok_or(SimError::NotHeld {
                process,
                resource: self.id,
            })?;
        self.users.swap_remove(index);

        match self.wait_queue.pop_front() {
            Some(next) => {
                self.grant(next);
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }

    fn grant(&mut self, process: ProcessId) {
        debug_assert!(self.users.len() < self.capacity);
        self.users.push(process);
        self.total_grants += 1;
    }
}
