// checkout-sim: discrete-event simulation of a single-line, multi-cashier checkout

pub mod checkout;
pub mod config;
pub mod error;
pub mod simulator;
pub mod web;

pub use checkout::{run_simulation, BasketBehavior, SimulationParams, SimulationResult};
pub use error::SimError;
