//! # Checkout line model
//!
//! A single line feeding one or more cashiers, built on the
//! [`simulator`](crate::simulator) kernel. Three kinds of process share the
//! cashier resource:
//!
//! - [`ArrivalGenerator`] spawns a [`Customer`] after every exponential
//!   inter-arrival gap (mean `1 / arrival_rate`).
//! - each [`Customer`] draws a basket, waits for a cashier, is served for
//!   `base_service_time * basket_size / 10` and leaves.
//! - [`QueueMonitor`] records the wait-queue length once per minute.
//!
//! ```rust
//! use checkout_sim::checkout::{run_simulation, SimulationParams};
//!
//! let params = SimulationParams { capacity: 2, seed: Some(42), ..Default::default() };
//! let result = run_simulation(&params).unwrap();
//! assert!(result.customers_served <= result.customers_arrived);
//! assert!((0.0..=100.0).contains(&result.cashier_utilization));
//! ```

pub mod basket;
pub mod processes;
pub mod stats;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Exp;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::simulator::{Environment, ResourceId};
pub use basket::{BasketBehavior, BasketSampler};
pub use processes::{ArrivalGenerator, Customer, QueueMonitor};
pub use stats::{Sample, StatsCollector, Summary};

/// Minutes between two queue-length samples
pub const MONITOR_INTERVAL: f64 = 1.0;

/// Inputs of one checkout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Simulated minutes to run for
    #[serde(default = "default_horizon")]
    pub horizon: f64,
    /// Number of cashiers
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Customers per minute
    #[serde(default = "default_arrival_rate")]
    pub arrival_rate: f64,
    /// Service minutes for a basket of ten items
    #[serde(default = "default_base_service_time")]
    pub base_service_time: f64,
    #[serde(default)]
    pub basket_behavior: BasketBehavior,
    /// Fixed RNG seed; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            capacity: default_capacity(),
            arrival_rate: default_arrival_rate(),
            base_service_time: default_base_service_time(),
            basket_behavior: BasketBehavior::default(),
            seed: None,
        }
    }
}

fn default_horizon() -> f64 { 60.0 }
fn default_capacity() -> usize { 1 }
fn default_arrival_rate() -> f64 { 1.0 }
fn default_base_service_time() -> f64 { 5.0 }

impl SimulationParams {
    /// Reject parameter sets that cannot produce a meaningful run.
    ///
    /// A zero horizon is accepted and yields an empty result.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(SimError::InvalidHorizon(self.horizon));
        }
        if self.capacity < 1 {
            return Err(SimError::InvalidCapacity(self.capacity));
        }
        positive("arrival_rate", self.arrival_rate)?;
        positive("base_service_time", self.base_service_time)?;
        Ok(())
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRate { parameter, value })
    }
}

/// Model state reachable from every checkout process
pub struct CheckoutState {
    pub rng: StdRng,
    pub arrivals: Exp<f64>,
    pub basket: BasketSampler,
    pub base_service_time: f64,
    pub stats: StatsCollector,
    /// Customers currently holding a cashier
    pub in_service: usize,
}

/// Aggregate outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub horizon: f64,
    pub cashiers: usize,
    pub basket_behavior: String,
    pub customers_arrived: u64,
    pub customers_served: u64,
    pub total_items_served: u64,
    pub avg_queue_length: f64,
    pub max_queue_length: usize,
    pub avg_wait_time: f64,
    pub max_wait_time: f64,
    pub cashier_utilization: f64,
    pub throughput: f64,
    pub queue_lengths: Vec<usize>,
    pub samples: Vec<Sample>,
    pub logs: Vec<String>,
}

/// A checkout run that can be driven step by step
pub struct CheckoutSimulation {
    env: Environment<CheckoutState>,
    cashier: ResourceId,
    params: SimulationParams,
    seed: u64,
}

impl CheckoutSimulation {
    pub fn new(params: SimulationParams) -> Result<Self, SimError> {
        params.validate()?;
        let seed = params.seed.unwrap_or_else(rand::random);
        let arrivals =
            Exp::new(params.arrival_rate).map_err(|e| SimError::Distribution(e.to_string()))?;
        let state = CheckoutState {
            rng: StdRng::seed_from_u64(seed),
            arrivals,
            basket: BasketSampler::new(params.basket_behavior.clone())?,
            base_service_time: params.base_service_time,
            stats: StatsCollector::new(params.capacity),
            in_service: 0,
        };

        let mut env = Environment::new(state);
        let cashier = env.add_resource(params.capacity)?;
        env.process(ArrivalGenerator::new(cashier));
        env.process(QueueMonitor::new(cashier, MONITOR_INTERVAL));

        Ok(Self {
            env,
            cashier,
            params,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn cashier(&self) -> ResourceId {
        self.cashier
    }

    pub fn environment(&self) -> &Environment<CheckoutState> {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment<CheckoutState> {
        &mut self.env
    }

    /// Run to the horizon and reduce the measurements.
    pub fn run(mut self) -> Result<SimulationResult, SimError> {
        tracing::info!(
            horizon = self.params.horizon,
            cashiers = self.params.capacity,
            arrival_rate = self.params.arrival_rate,
            basket_behavior = %self.params.basket_behavior,
            seed = self.seed,
            "Starting checkout simulation"
        );
        self.env.run(self.params.horizon)?;
        Ok(self.finish())
    }

    /// Reduce whatever has been simulated so far into a result.
    pub fn finish(self) -> SimulationResult {
        let horizon = self.params.horizon;
        let (state, mut logs) = self.env.into_parts();
        let stats = state.stats;
        let summary = stats.summarize(horizon);

        logs.push(String::new());
        logs.push(format!(
            "Total customers served in {:?} minutes: {}",
            horizon,
            stats.customers_served()
        ));
        logs.push(format!("Total items served: {}", stats.total_items_served()));
        logs.push(format!("Average queue length: {:.2}", summary.avg_queue_length));
        logs.push(format!("Maximum queue length: {}", summary.max_queue_length));
        logs.push(format!("Average wait time: {:.2} mins", summary.avg_wait_time));
        logs.push(format!("Maximum wait time: {:.2} mins", summary.max_wait_time));
        logs.push(format!("Cashier utilization: {:.2}%", summary.utilization));
        logs.push(format!("Throughput: {:.2} items per minute", summary.throughput));

        tracing::info!(
            customers_served = stats.customers_served(),
            utilization = summary.utilization,
            "Checkout simulation finished"
        );

        SimulationResult {
            seed: self.seed,
            horizon,
            cashiers: self.params.capacity,
            basket_behavior: self.params.basket_behavior.label().to_string(),
            customers_arrived: stats.customers_arrived(),
            customers_served: stats.customers_served(),
            total_items_served: stats.total_items_served(),
            avg_queue_length: summary.avg_queue_length,
            max_queue_length: summary.max_queue_length,
            avg_wait_time: summary.avg_wait_time,
            max_wait_time: summary.max_wait_time,
            cashier_utilization: summary.utilization,
            throughput: summary.throughput,
            queue_lengths: stats.samples().iter().map(|s| s.queue_length).collect(),
            samples: stats.samples().to_vec(),
            logs,
        }
    }
}

/// Run one checkout simulation to completion.
pub fn run_simulation(params: &SimulationParams) -> Result<SimulationResult, SimError> {
    CheckoutSimulation::new(params.clone())?.run()
}
