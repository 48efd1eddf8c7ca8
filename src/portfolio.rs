// src/portfolio.rs

//! The portfolio-optimizer collaborator boundary. The engine treats the
//! optimizer as a pure function of forecast state; a non-finite output is
//! fatal for the run, never silently replaced by a default.

/// Maps a trader's forecast state to a target stock weight in [0, 1] of
/// portfolio value. Implementations must be pure: same inputs, same output,
/// no interior randomness, or seed determinism of the whole run breaks.
pub trait PortfolioOptimizer {
    fn target_stock_weight(
        &self,
        expected_return: f64,
        covariance: f64,
        risk_aversion: f64,
        wealth: f64,
    ) -> f64;
}

/// Closed-form two-asset mean-variance rule: weight proportional to the
/// forecast return over risk-aversion-scaled variance, clamped to [0, 1].
/// Wealth does not enter the closed form (CRRA-style weights are scale-free)
/// but stays in the signature for optimizers that need it.
pub struct MeanVariance;

impl PortfolioOptimizer for MeanVariance {
    fn target_stock_weight(
        &self,
        expected_return: f64,
        covariance: f64,
        risk_aversion: f64,
        _wealth: f64,
    ) -> f64 {
        (expected_return / (risk_aversion * covariance)).clamp(0.0, 1.0)
    }
}
