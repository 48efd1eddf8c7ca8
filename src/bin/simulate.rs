// src/bin/simulate.rs

//! Headless single-run driver. Runs one simulation with the default
//! parameter set, or with a JSON parameter file given as the first argument:
//!
//!   cargo run --bin simulate -- params.json

use exuberance_market::{Market, ModelConfig};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config: ModelConfig = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ModelConfig::default(),
    };
    let seed = 0;

    let start = Instant::now();
    let mut market = Market::new(config, seed)?;
    market.run()?;

    println!(
        "simulated {} ticks in {:?}; last close {:.4}",
        market.config().ticks,
        start.elapsed(),
        market.order_book.last_close()
    );
    Ok(())
}
