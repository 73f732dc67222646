//! # Discrete-event simulation kernel
//!
//! The [`Environment`] owns a clock, a stable event queue, a table of
//! suspended processes and a set of FIFO [`Resource`]s. Processes are explicit
//! state machines: every call to [`Process::resume`] runs one step of logic and
//! returns the next suspension point as a [`Yield`]. Nothing runs on real
//! threads; concurrency is the interleaving of resumptions through the queue.
//!
//! ```rust
//! use checkout_sim::simulator::{Context, Environment, Process, Yield};
//! use checkout_sim::SimError;
//!
//! struct Ticker;
//!
//! impl Process<Vec<f64>> for Ticker {
//!     fn resume(&mut self, ctx: &mut Context<'_, Vec<f64>>) -> Result<Yield, SimError> {
//!         let now = ctx.now();
//!         ctx.state().push(now);
//!         Ok(Yield::Timeout(1.0))
//!     }
//! }
//!
//! let mut env = Environment::new(Vec::new());
//! env.process(Ticker);
//! env.run(3.0).unwrap();
//! assert_eq!(env.state(), &vec![0.0, 1.0, 2.0, 3.0]);
//! ```

pub mod event_queue;
pub mod resource;

use crate::error::SimError;
use event_queue::{SimClock, SimEventQueue};
pub use resource::{Request, Resource};

/// Index of a process in the environment's process table
pub type ProcessId = usize;
/// Index of a resource registered with [`Environment::add_resource`]
pub type ResourceId = usize;

/// Suspension point returned by a process step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Yield {
    /// Resume after `delay` units of simulated time.
    Timeout(f64),
    /// Resume once a slot of the resource has been granted.
    Acquire(ResourceId),
    /// The process has finished and is never resumed again.
    Done,
}

/// A logical process driven by the kernel.
pub trait Process<S> {
    /// Run until the next suspension point.
    fn resume(&mut self, ctx: &mut Context<'_, S>) -> Result<Yield, SimError>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// One resumption as seen by the kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resumption {
    pub time: f64,
    pub sequence: u64,
    pub process: ProcessId,
}

type ProcessTable<S> = Vec<Option<Box<dyn Process<S>>>>;

/// Handle given to a running process for the duration of one step
pub struct Context<'a, S> {
    pid: ProcessId,
    now: f64,
    queue: &'a mut SimEventQueue,
    resources: &'a mut [Resource],
    processes: &'a mut ProcessTable<S>,
    log: &'a mut Vec<String>,
    state: &'a mut S,
}

impl<S: 'static> Context<'_, S> {
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Id of the process being resumed
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Model state shared by every process
    pub fn state(&mut self) -> &mut S {
        &mut *self.state
    }

    /// Start a new process at the current time.
    ///
    /// The child's first step is queued now, ahead of whatever the running
    /// process yields at the end of this step.
    pub fn spawn<P: Process<S> + 'static>(&mut self, process: P) -> ProcessId {
        register(self.processes, self.queue, self.now, Box::new(process))
    }

    /// Give back a slot held by the running process.
    pub fn release(&mut self, resource: ResourceId) -> Result<(), SimError> {
        let pid = self.pid;
        let granted = self
            .resources
            .get_mut(resource)
            .ok_or(SimError::UnknownResource(resource))?
            .release(pid)?;
        if let Some(next) = granted {
            tracing::trace!(resource, process = next, "slot handed to waiting process");
            self.queue.push(self.now, next);
        }
        Ok(())
    }

    pub fn resource(&self, resource: ResourceId) -> Result<&Resource, SimError> {
        self.resources
            .get(resource)
            .ok_or(SimError::UnknownResource(resource))
    }

    /// Number of requests waiting on `resource`, holders excluded
    pub fn queue_len(&self, resource: ResourceId) -> Result<usize, SimError> {
        self.resource(resource).map(Resource::queue_len)
    }

    pub fn in_use(&self, resource: ResourceId) -> Result<usize, SimError> {
        self.resource(resource).map(Resource::in_use)
    }

    /// Append a line to the run log.
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(time = self.now, "{}", line);
        self.log.push(line);
    }
}

/// The simulation kernel
pub struct Environment<S> {
    clock: SimClock,
    queue: SimEventQueue,
    processes: ProcessTable<S>,
    resources: Vec<Resource>,
    log: Vec<String>,
    trace: Option<Vec<Resumption>>,
    state: S,
}

impl<S: 'static> Environment<S> {
    pub fn new(state: S) -> Self {
        Self {
            clock: SimClock::new(),
            queue: SimEventQueue::new(),
            processes: Vec::new(),
            resources: Vec::new(),
            log: Vec::new(),
            trace: None,
            state,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn add_resource(&mut self, capacity: usize) -> Result<ResourceId, SimError> {
        let id = self.resources.len();
        self.resources.push(Resource::new(id, capacity)?);
        Ok(id)
    }

    pub fn resource(&self, resource: ResourceId) -> Option<&Resource> {
        self.resources.get(resource)
    }

    /// Register a process; its first step runs at the current time.
    pub fn process<P: Process<S> + 'static>(&mut self, process: P) -> ProcessId {
        let now = self.clock.now();
        register(&mut self.processes, &mut self.queue, now, Box::new(process))
    }

    /// Queue a resumption of `process` after `delay`.
    pub fn schedule(&mut self, delay: f64, process: ProcessId) -> Result<u64, SimError> {
        schedule_after(&mut self.queue, self.clock.now(), delay, process)
    }

    /// Whether `process` is still alive (registered and not finished)
    pub fn is_alive(&self, process: ProcessId) -> bool {
        self.processes.get(process).is_some_and(Option::is_some)
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the next event, if any
    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek_time()
    }

    /// Start recording every resumption; see [`Environment::trace`].
    pub fn record_trace(&mut self) {
        self.trace.get_or_insert_with(Vec::new);
    }

    pub fn trace(&self) -> &[Resumption] {
        self.trace.as_deref().unwrap_or(&[])
    }

    /// Pop and resume the earliest event. Returns `false` when the queue is empty.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(event) = self.queue.pop() else {
            return Ok(false);
        };
        self.clock.advance_to(event.due_time);
        if let Some(trace) = self.trace.as_mut() {
            trace.push(Resumption {
                time: event.due_time,
                sequence: event.sequence,
                process: event.process,
            });
        }

        let pid = event.process;
        let mut process = self
            .processes
            .get_mut(pid)
            .and_then(Option::take)
            .ok_or(SimError::UnknownProcess(pid))?;
        tracing::trace!(time = event.due_time, sequence = event.sequence, process = pid, name = process.name(), "resume");

        let now = self.clock.now();
        let mut ctx = Context {
            pid,
            now,
            queue: &mut self.queue,
            resources: &mut self.resources,
            processes: &mut self.processes,
            log: &mut self.log,
            state: &mut self.state,
        };
        let outcome = process.resume(&mut ctx)?;

        match outcome {
            Yield::Timeout(delay) => {
                self.processes[pid] = Some(process);
                schedule_after(&mut self.queue, now, delay, pid)?;
            }
            Yield::Acquire(resource) => {
                self.processes[pid] = Some(process);
                let request = self
                    .resources
                    .get_mut(resource)
                    .ok_or(SimError::UnknownResource(resource))?
                    .request(pid);
                match request {
                    // Still routed through the queue so simultaneous events keep their order.
                    Request::Granted => {
                        self.queue.push(now, pid);
                    }
                    Request::Queued { position } => {
                        tracing::trace!(resource, process = pid, position, "waiting for slot");
                    }
                }
            }
            Yield::Done => {
                tracing::trace!(process = pid, "process finished");
            }
        }
        Ok(true)
    }

    /// Process every event due at or before `until`.
    ///
    /// Processes that never finish are simply left parked once the next event
    /// lies beyond the horizon.
    pub fn run(&mut self, until: f64) -> Result<(), SimError> {
        if until.is_nan() || until < 0.0 {
            return Err(SimError::InvalidHorizon(until));
        }
        while let Some(due) = self.queue.peek_time() {
            if due > until {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Lines logged by processes so far, in order
    pub fn logs(&self) -> &[String] {
        &self.log
    }

    /// Consume the environment, returning the model state and the run log.
    pub fn into_parts(self) -> (S, Vec<String>) {
        (self.state, self.log)
    }
}

fn register<S: 'static>(
    processes: &mut ProcessTable<S>,
    queue: &mut SimEventQueue,
    now: f64,
    process: Box<dyn Process<S>>,
) -> ProcessId {
    let pid = processes.len();
    tracing::trace!(process = pid, name = process.name(), time = now, "spawn");
    processes.push(Some(process));
    queue.push(now, pid);
    pid
}

fn schedule_after(
    queue: &mut SimEventQueue,
    now: f64,
    delay: f64,
    process: ProcessId,
) -> Result<u64, SimError> {
    if !delay.is_finite() || delay < 0.0 {
        return Err(SimError::InvalidDelay(delay));
    }
    Ok(queue.push(now + delay, process))
}
