//! Contains the data models for API requests and responses.

use serde::{Deserialize, Serialize};

use crate::checkout::{BasketBehavior, SimulationParams};

/// Query string of `GET /run-simulation`. Omitted fields take the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RunSimulationQuery {
    /// Simulated minutes
    pub duration: Option<f64>,
    pub cashiers: Option<usize>,
    /// Customers per minute
    pub arrival_rate: Option<f64>,
    /// Base service minutes per ten items
    pub service_time: Option<f64>,
    pub basket_behavior: Option<String>,
    pub seed: Option<u64>,
}

impl RunSimulationQuery {
    pub fn into_params(self, defaults: &SimulationParams) -> SimulationParams {
        SimulationParams {
            horizon: self.duration.unwrap_or(defaults.horizon),
            capacity: self.cashiers.unwrap_or(defaults.capacity),
            arrival_rate: self.arrival_rate.unwrap_or(defaults.arrival_rate),
            base_service_time: self.service_time.unwrap_or(defaults.base_service_time),
            basket_behavior: self
                .basket_behavior
                .map(BasketBehavior::from)
                .unwrap_or_else(|| defaults.basket_behavior.clone()),
            seed: self.seed.or(defaults.seed),
        }
    }
}

/// Liveness probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
