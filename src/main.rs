// src/main.rs - HTTP host exposing the checkout simulation
use checkout_sim::config::{self, Config};
use checkout_sim::web;
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "checkout.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting checkout simulation host");

    // Get configuration file path
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            config::load_config(path)?
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            tracing::info!("Loading configuration from: {}", DEFAULT_CONFIG_PATH);
            config::load_config(DEFAULT_CONFIG_PATH)?
        }
        None => {
            tracing::info!("No configuration file found, using defaults");
            Config::default()
        }
    };

    let defaults = &config.simulation;
    tracing::info!(
        "Defaults: {} min horizon, {} cashier(s), {} arrivals/min, {} min base service, '{}' baskets",
        defaults.horizon,
        defaults.capacity,
        defaults.arrival_rate,
        defaults.base_service_time,
        defaults.basket_behavior
    );

    let app = web::api::create_router(config.simulation.clone(), config.server.cors_enabled);

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    tracing::info!("Web API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
