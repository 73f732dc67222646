//! CLI entry point for the simulation harness: single runs and cashier-count sweeps.

use checkout_sim::checkout::{SimulationParams, SimulationResult, run_simulation};
use checkout_sim::config::{self, Config};
use checkout_sim::web::models::RunSimulationQuery;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Simulation Harness CLI
#[derive(Parser, Debug)]
#[command(name = "sim-harness", about = "Checkout line simulation harness for single runs and sweeps.")]
pub struct Cli {
    /// Path to a TOML config file (overrides defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated minutes
    #[arg(long)]
    duration: Option<f64>,

    /// Number of cashiers
    #[arg(long)]
    cashiers: Option<usize>,

    /// Customers per minute
    #[arg(long)]
    arrival_rate: Option<f64>,

    /// Base service minutes per ten items
    #[arg(long)]
    service_time: Option<f64>,

    /// Basket behavior: normal, seasonal, anything else is uniform
    #[arg(long)]
    basket_behavior: Option<String>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single simulation (default)
    Run,
    /// Run the same scenario with 1..=N cashiers
    Sweep {
        #[arg(long, default_value_t = 5)]
        max_cashiers: usize,
    },
}

impl Cli {
    fn params(&self, defaults: &SimulationParams) -> SimulationParams {
        RunSimulationQuery {
            duration: self.duration,
            cashiers: self.cashiers,
            arrival_rate: self.arrival_rate,
            service_time: self.service_time,
            basket_behavior: self.basket_behavior.clone(),
            seed: self.seed,
        }
        .into_params(defaults)
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_summary_header() {
    println!(
        "{:>8} {:>8} {:>10} {:>10} {:>10} {:>12} {:>11}",
        "cashiers", "served", "avg_wait", "max_wait", "avg_queue", "utilization", "throughput"
    );
}

fn print_summary_row(result: &SimulationResult) {
    println!(
        "{:>8} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>11.2}% {:>11.2}",
        result.cashiers,
        result.customers_served,
        result.avg_wait_time,
        result.max_wait_time,
        result.avg_queue_length,
        result.cashier_utilization,
        result.throughput
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1. Load config (default or from file)
    let config = match cli.config {
        Some(ref path) => {
            let path = path.to_str().unwrap_or_else(|| fail("Invalid config path"));
            config::load_config(path).unwrap_or_else(|e| fail(format!("Failed to load config: {e}")))
        }
        None => Config::default(),
    };

    // 2. Apply command-line overrides
    let params = cli.params(&config.simulation);

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Run => {
            let result = run_simulation(&params).unwrap_or_else(|e| fail(e));
            if cli.json {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => fail(e),
                }
            } else {
                for line in &result.logs {
                    println!("{line}");
                }
                println!("Seed: {}", result.seed);
            }
        }
        Commands::Sweep { max_cashiers } => {
            // Every cashier count sees the same seed.
            let seed = params.seed.unwrap_or_else(rand::random);
            let results: Vec<SimulationResult> = (1..=*max_cashiers)
                .map(|capacity| {
                    let params = SimulationParams {
                        capacity,
                        seed: Some(seed),
                        ..params.clone()
                    };
                    run_simulation(&params).unwrap_or_else(|e| fail(e))
                })
                .collect();
            if cli.json {
                match serde_json::to_string_pretty(&results) {
                    Ok(json) => println!("{json}"),
                    Err(e) => fail(e),
                }
            } else {
                println!("Seed: {seed}");
                print_summary_header();
                for result in &results {
                    print_summary_row(result);
                }
            }
        }
    }
}
