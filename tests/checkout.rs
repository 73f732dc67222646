// Integration tests for the checkout line model

use checkout_sim::checkout::{
    BasketBehavior, BasketSampler, CheckoutSimulation, SimulationParams, run_simulation,
};
use checkout_sim::SimError;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn params(horizon: f64, capacity: usize, arrival_rate: f64, seed: u64) -> SimulationParams {
    SimulationParams {
        horizon,
        capacity,
        arrival_rate,
        seed: Some(seed),
        ..Default::default()
    }
}

fn customer_id(line: &str) -> u64 {
    line.split_whitespace()
        .nth(1)
        .and_then(|id| id.parse().ok())
        .expect("customer line carries an id")
}

#[test]
fn test_same_seed_same_result() {
    let params = SimulationParams {
        basket_behavior: BasketBehavior::Seasonal,
        ..params(60.0, 2, 1.5, 2024)
    };
    let first = run_simulation(&params).unwrap();
    let second = run_simulation(&params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_zero_horizon_is_empty() {
    let result = run_simulation(&params(0.0, 1, 1.0, 1)).unwrap();
    assert_eq!(result.customers_served, 0);
    assert_eq!(result.avg_wait_time, 0.0);
    assert_eq!(result.max_wait_time, 0.0);
    assert!(result.samples.is_empty());
    assert!(result.queue_lengths.is_empty());
    assert_eq!(result.throughput, 0.0);
    assert_eq!(result.cashier_utilization, 0.0);
}

#[test]
fn test_single_cashier_scenario_log() {
    let params = SimulationParams {
        base_service_time: 5.0,
        ..params(10.0, 1, 2.0, 17)
    };
    let result = run_simulation(&params).unwrap();

    let arrivals: Vec<&String> = result.logs.iter().filter(|l| l.contains(" arrived at ")).collect();
    let served: Vec<&String> = result.logs.iter().filter(|l| l.contains(" served at ")).collect();
    assert_eq!(arrivals.len() as u64, result.customers_arrived);
    assert_eq!(served.len() as u64, result.customers_served);
    assert_eq!(result.logs.len(), arrivals.len() + served.len() + 9);

    // Ids are handed out in arrival order.
    let arrival_ids: Vec<u64> = arrivals.iter().map(|l| customer_id(l)).collect();
    assert_eq!(arrival_ids, (1..=result.customers_arrived).collect::<Vec<_>>());

    // One cashier and a FIFO line: customers leave in the order they came.
    let served_ids: Vec<u64> = served.iter().map(|l| customer_id(l)).collect();
    assert!(served_ids.windows(2).all(|w| w[0] < w[1]));
    if let Some(first) = served_ids.first() {
        assert_eq!(*first, 1);
    }

    assert_eq!(result.queue_lengths.len(), 10);
    assert_eq!(run_simulation(&params).unwrap().logs, result.logs);
}

#[test]
fn test_single_cashier_seed_17_regression() {
    let params = SimulationParams {
        base_service_time: 5.0,
        ..params(10.0, 1, 2.0, 17)
    };
    let result = run_simulation(&params).unwrap();
    assert_eq!(result.customers_arrived, 20);
    assert_eq!(result.customers_served, 2);
    assert_eq!(result.total_items_served, 13);
    assert!((result.cashier_utilization - 65.0).abs() < 1e-9);
    assert!((result.throughput - 1.3).abs() < 1e-12);

    let logs = &result.logs;
    assert_eq!(logs.len(), 31);
    assert_eq!(logs[0], "Customer 1 arrived at 2.0 mins with 3 items");
    assert_eq!(logs[1], "Customer 2 arrived at 2.4 mins with 10 items");

    let served: Vec<&String> = logs.iter().filter(|l| l.contains(" served at ")).collect();
    assert_eq!(served.len(), 2);
    assert_eq!(served[0], "Customer 1 served at 3.5 (Waited 0.0 mins, Service 1.5 mins)");
    assert!(served[1].starts_with("Customer 2 served at "));
    assert!(served[1].ends_with(", Service 5.0 mins)"));

    // Everything before the summary is the 20 arrivals plus the 2 services.
    assert!(logs[..22].iter().all(|l| l.starts_with("Customer ")));
    assert_eq!(
        &logs[22..25],
        &[
            String::new(),
            "Total customers served in 10.0 minutes: 2".to_string(),
            "Total items served: 13".to_string(),
        ]
    );
    assert!(logs[25].starts_with("Average queue length: "));
    assert!(logs[26].starts_with("Maximum queue length: "));
    assert!(logs[27].starts_with("Average wait time: "));
    assert!(logs[28].starts_with("Maximum wait time: "));
    assert_eq!(logs[29], "Cashier utilization: 65.00%");
    assert_eq!(logs[30], "Throughput: 1.30 items per minute");
}

#[test]
fn test_three_cashier_bounds() {
    for seed in 0..20 {
        let result = run_simulation(&params(60.0, 3, 1.0, seed)).unwrap();
        assert!((0.0..=100.0).contains(&result.cashier_utilization));
        assert!(result.avg_queue_length >= 0.0);
        assert!(result.avg_queue_length <= result.max_queue_length as f64);
        assert!(result.avg_wait_time <= result.max_wait_time);
        assert!(result.customers_served <= result.customers_arrived);
    }
}

#[test]
fn test_busy_line_saturates_cashier() {
    // Two arrivals a minute against roughly four minutes of service each.
    let result = run_simulation(&params(120.0, 1, 2.0, 8)).unwrap();
    assert!(result.cashier_utilization > 80.0);
    assert!(result.cashier_utilization <= 100.0);
    assert!(result.max_queue_length > 0);
    assert!(result.max_wait_time > 0.0);
}

#[test]
fn test_capacity_invariant_stepwise() {
    let mut sim = CheckoutSimulation::new(params(60.0, 2, 2.0, 31)).unwrap();
    let cashier = sim.cashier();
    loop {
        let env = sim.environment_mut();
        match env.peek_time() {
            Some(due) if due <= 60.0 => {
                env.step().unwrap();
            }
            _ => break,
        }
        let env = sim.environment();
        let resource = env.resource(cashier).unwrap();
        assert!(resource.in_use() <= resource.capacity());
        // Grants whose zero-delay resumption is still queued are the only gap.
        assert!(resource.in_use() >= env.state().in_service);
    }
    let result = sim.finish();
    assert!(result.customers_served <= result.customers_arrived);
}

#[test]
fn test_invalid_parameters_rejected() {
    assert_eq!(
        run_simulation(&params(-5.0, 1, 1.0, 1)).unwrap_err(),
        SimError::InvalidHorizon(-5.0)
    );
    assert_eq!(
        run_simulation(&params(60.0, 0, 1.0, 1)).unwrap_err(),
        SimError::InvalidCapacity(0)
    );
    assert!(matches!(
        run_simulation(&params(60.0, 1, 0.0, 1)),
        Err(SimError::InvalidRate { .. })
    ));
    let no_service = SimulationParams {
        base_service_time: 0.0,
        ..params(60.0, 1, 1.0, 1)
    };
    assert!(matches!(run_simulation(&no_service), Err(SimError::InvalidRate { .. })));
}

fn large_basket_share(behavior: BasketBehavior, rng: &mut StdRng) -> f64 {
    let sampler = BasketSampler::new(behavior).unwrap();
    let large = (0..10_000).filter(|_| sampler.sample(rng) >= 14).count();
    large as f64 / 10_000.0
}

#[test]
fn test_seasonal_baskets_run_larger() {
    let mut rng = StdRng::seed_from_u64(10_000);
    let normal = large_basket_share(BasketBehavior::Normal, &mut rng);
    let seasonal = large_basket_share(BasketBehavior::Seasonal, &mut rng);
    // Expected shares are 7/55 and 28/70.
    assert!((normal - 0.127).abs() < 0.03, "normal share {normal}");
    assert!((seasonal - 0.4).abs() < 0.03, "seasonal share {seasonal}");
    assert!(seasonal > normal + 0.2);
}

#[test]
fn test_unknown_behavior_is_uniform() {
    let mut rng = StdRng::seed_from_u64(3);
    let sampler = BasketSampler::new(BasketBehavior::from("mystery")).unwrap();
    let mut counts = [0u32; 20];
    for _ in 0..20_000 {
        counts[(sampler.sample(&mut rng) - 1) as usize] += 1;
    }
    // 1000 expected per size
    assert!(counts.iter().all(|&c| (800..1200).contains(&c)), "{counts:?}");
}
