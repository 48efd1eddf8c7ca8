// src/error.rs

//! Error types for the simulation engine.

use std::fmt;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors the engine can surface. There are no retries anywhere: a run either
/// completes or fails fast, leaving the histories built so far inspectable.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed run configuration, detected before the first tick.
    Config(String),
    /// The portfolio optimizer produced a non-finite target weight.
    PortfolioOptimizer { trader: usize, tick: usize },
    /// A crossed book survived match exhaustion. Internal-consistency bug.
    MatchingInvariant { bid: f64, ask: f64 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            SimError::PortfolioOptimizer { trader, tick } => write!(
                f,
                "portfolio optimizer returned a non-finite weight for trader {} at tick {}",
                trader, tick
            ),
            SimError::MatchingInvariant { bid, ask } => write!(
                f,
                "book still crossed after matching: best bid {} >= best ask {}",
                bid, ask
            ),
        }
    }
}

impl std::error::Error for SimError {}
