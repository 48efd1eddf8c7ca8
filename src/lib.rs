// src/lib.rs

//! Agent-based continuous double-auction market simulator.
//!
//! Heterogeneous traders (fundamentalists, chartists, noise) quote into a
//! price/time-priority limit order book, tick by tick, producing the price,
//! return, volume and wealth histories that downstream stylized-fact and
//! inequality analyses consume.

// === 1. Declare all the top-level modules ===
pub mod agents;
pub mod config;
pub mod error;
pub mod init;
pub mod market;
pub mod portfolio;
pub mod simulators;
pub mod types;

// === 2. Re-export the public-facing components to create a clean API ===

// --- From `agents` ---
pub use agents::expectations::{chartist_components, covariance_estimate, expected_return};
pub use agents::trader::{Trader, TraderParams};

// --- From our `market` engine ---
pub use market::Market;

// --- From `simulators` ---
pub use simulators::fundamental::{ConstantFundamental, FundamentalProcess, OrnsteinUhlenbeck};
pub use simulators::order_book::{Fill, OrderBook, PriceLevel};

// --- Collaborator boundary ---
pub use portfolio::{MeanVariance, PortfolioOptimizer};

// --- From `types` ---
pub use types::order::{Order, OrderId, Price, Side};

// --- Configuration and errors ---
pub use config::ModelConfig;
pub use error::{Result, SimError};
