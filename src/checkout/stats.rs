// src/checkout/stats.rs - Measurements collected during a run and their reduction
use serde::Serialize;

/// Queue depth observed by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub queue_length: usize,
}

/// Per-run measurement sink
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    customers_arrived: u64,
    customers_served: u64,
    total_items_served: u64,
    wait_times: Vec<f64>,
    samples: Vec<Sample>,
    busy_time: Vec<f64>,
}

/// Summary metrics reduced from a [`StatsCollector`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub avg_queue_length: f64,
    pub max_queue_length: usize,
    pub avg_wait_time: f64,
    pub max_wait_time: f64,
    pub utilization: f64,
    pub throughput: f64,
}

impl StatsCollector {
    pub fn new(servers: usize) -> Self {
        Self {
            busy_time: vec![0.0; servers],
            ..Self::default()
        }
    }

    pub fn record_arrival(&mut self) {
        self.customers_arrived += 1;
    }

    pub fn record_wait(&mut self, wait_time: f64) {
        self.wait_times.push(wait_time);
    }

    /// Count a completed service.
    ///
    /// Busy time is spread evenly over every server instead of being charged
    /// to the one that actually served the customer.
    pub fn record_service(&mut self, items: u32, service_time: f64) {
        self.customers_served += 1;
        self.total_items_served += u64::from(items);
        let servers = self.busy_time.len() as f64;
        for busy in &mut self.busy_time {
            *busy += service_time / servers;
        }
    }

    pub fn record_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn customers_arrived(&self) -> u64 {
        self.customers_arrived
    }

    pub fn customers_served(&self) -> u64 {
        self.customers_served
    }

    pub fn total_items_served(&self) -> u64 {
        self.total_items_served
    }

    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn busy_time(&self) -> f64 {
        self.busy_time.iter().sum()
    }

    /// Reduce the collected measurements over a run of length `horizon`.
    ///
    /// Every ratio with an empty or zero denominator is reported as 0.
    pub fn summarize(&self, horizon: f64) -> Summary {
        let lengths = self.samples.iter().map(|s| s.queue_length);
        let max_queue_length = lengths.clone().max().unwrap_or(0);
        let avg_queue_length = mean(lengths.map(|len| len as f64));

        let avg_wait_time = mean(self.wait_times.iter().copied());
        let max_wait_time = self.wait_times.iter().copied().fold(0.0, f64::max);

        let capacity = self.busy_time.len() as f64;
        let utilization = ratio(self.busy_time(), capacity * horizon) * 100.0;
        let throughput = ratio(self.total_items_served as f64, horizon);

        Summary {
            avg_queue_length,
            max_queue_length,
            avg_wait_time,
            max_wait_time,
            utilization,
            throughput,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    ratio(sum, count as f64)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
