// src/checkout/processes.rs - Logical processes of the checkout line
use rand_distr::Distribution;

use crate::error::SimError;
use crate::simulator::{Context, Process, ResourceId, Yield};

use super::CheckoutState;
use super::stats::Sample;

/// Spawns customers at exponentially distributed intervals, forever.
#[derive(Debug)]
pub struct ArrivalGenerator {
    cashier: ResourceId,
    spawned: u64,
    started: bool,
}

impl ArrivalGenerator {
    pub fn new(cashier: ResourceId) -> Self {
        Self {
            cashier,
            spawned: 0,
            started: false,
        }
    }
}

impl Process<CheckoutState> for ArrivalGenerator {
    fn resume(&mut self, ctx: &mut Context<'_, CheckoutState>) -> Result<Yield, SimError> {
        if self.started {
            self.spawned += 1;
            ctx.spawn(Customer::new(self.spawned, self.cashier));
        }
        self.started = true;

        let state = ctx.state();
        let interval = state.arrivals.sample(&mut state.rng);
        Ok(Yield::Timeout(interval))
    }

    fn name(&self) -> &str {
        "arrivals"
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Arriving,
    Waiting {
        arrival_time: f64,
        basket_size: u32,
        service_time: f64,
    },
    InService {
        basket_size: u32,
        service_time: f64,
        wait_time: f64,
    },
}

/// One shopper: queue for a cashier, get served, leave.
#[derive(Debug)]
pub struct Customer {
    id: u64,
    cashier: ResourceId,
    stage: Stage,
}

impl Customer {
    pub fn new(id: u64, cashier: ResourceId) -> Self {
        Self {
            id,
            cashier,
            stage: Stage::Arriving,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Process<CheckoutState> for Customer {
    fn resume(&mut self, ctx: &mut Context<'_, CheckoutState>) -> Result<Yield, SimError> {
        let now = ctx.now();
        match self.stage {
            Stage::Arriving => {
                let state = ctx.state();
                state.stats.record_arrival();
                let basket_size = state.basket.sample(&mut state.rng);
                let service_time = state.base_service_time * (f64::from(basket_size) / 10.0);
                ctx.log(format!(
                    "Customer {} arrived at {:.1} mins with {} items",
                    self.id, now, basket_size
                ));
                self.stage = Stage::Waiting {
                    arrival_time: now,
                    basket_size,
                    service_time,
                };
                Ok(Yield::Acquire(self.cashier))
            }
            Stage::Waiting {
                arrival_time,
                basket_size,
                service_time,
            } => {
                let wait_time = now - arrival_time;
                let state = ctx.state();
                state.stats.record_wait(wait_time);
                state.in_service += 1;
                self.stage = Stage::InService {
                    basket_size,
                    service_time,
                    wait_time,
                };
                Ok(Yield::Timeout(service_time))
            }
            Stage::InService {
                basket_size,
                service_time,
                wait_time,
            } => {
                ctx.release(self.cashier)?;
                let state = ctx.state();
                state.in_service -= 1;
                state.stats.record_service(basket_size, service_time);
                ctx.log(format!(
                    "Customer {} served at {:.1} (Waited {:.1} mins, Service {:.1} mins)",
                    self.id, now, wait_time, service_time
                ));
                Ok(Yield::Done)
            }
        }
    }

    fn name(&self) -> &str {
        "customer"
    }
}

/// Samples the cashier's wait-queue length at a fixed interval.
#[derive(Debug)]
pub struct QueueMonitor {
    cashier: ResourceId,
    interval: f64,
    started: bool,
}

impl QueueMonitor {
    pub fn new(cashier: ResourceId, interval: f64) -> Self {
        Self {
            cashier,
            interval,
            started: false,
        }
    }
}

impl Process<CheckoutState> for QueueMonitor {
    fn resume(&mut self, ctx: &mut Context<'_, CheckoutState>) -> Result<Yield, SimError> {
        if self.started {
            let sample = Sample {
                time: ctx.now(),
                queue_length: ctx.queue_len(self.cashier)?,
            };
            ctx.state().stats.record_sample(sample);
        }
        self.started = true;
        Ok(Yield::Timeout(self.interval))
    }

    fn name(&self) -> &str {
        "monitor"
    }
}
