// src/error.rs - Errors raised by the kernel and the checkout model
use thiserror::Error;

use crate::simulator::{ProcessId, ResourceId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid delay {0}: events can only be scheduled at or after the current time")]
    InvalidDelay(f64),
    #[error("Process {process} released resource {resource} without holding it")]
    NotHeld {
        process: ProcessId,
        resource: ResourceId,
    },
    #[error("Unknown process {0}")]
    UnknownProcess(ProcessId),
    #[error("Unknown resource {0}")]
    UnknownResource(ResourceId),
    #[error("Invalid horizon {0}: a simulation must run forward over a finite span")]
    InvalidHorizon(f64),
    #[error("Invalid capacity {0}: at least one server is required")]
    InvalidCapacity(usize),
    #[error("Invalid {parameter} {value}: must be a positive, finite number")]
    InvalidRate { parameter: &'static str, value: f64 },
    #[error("Distribution error: {0}")]
    Distribution(String),
}
