// src/agents/expectations.rs

//! Forecast building blocks: the chartist moving-average ladder, the
//! trailing-window covariance estimate and the weighted forecast return.

use crate::agents::trader::TraderParams;
use statrs::statistics::Statistics;

/// Equally weighted moving averages of the most recent returns, one entry per
/// window length: `components[k]` is the mean of the last `k + 1` returns.
/// Each trader indexes this ladder with its own horizon, so it is computed
/// once per tick and shared by all active traders.
pub fn chartist_components(returns: &[f64]) -> Vec<f64> {
    let mut components = Vec::with_capacity(returns.len());
    let mut running_sum = 0.0;
    for (window, ret) in returns.iter().rev().enumerate() {
        running_sum += ret;
        components.push(running_sum / (window as f64 + 1.0));
    }
    components
}

/// Return variance over the trader's trailing window plus the squared noise
/// std. Single-asset model, so the "covariance matrix" collapses to this
/// scalar. Degenerate windows produce NaN, which propagates by policy.
pub fn covariance_estimate(window: &[f64], std_noise: f64) -> f64 {
    window.variance() + std_noise * std_noise
}

/// Combines the fundamentalist, chartist and noise components into the
/// forecast return. Missing chartist history contributes zero.
pub fn expected_return(
    par: &TraderParams,
    fundamental_component: f64,
    horizon_multiplier: f64,
    chartist: &[f64],
    noise: f64,
) -> f64 {
    let fundamentalist = fundamental_component / (par.horizon as f64 * horizon_multiplier);
    let chartist_term = chartist.get(par.horizon - 1).copied().unwrap_or(0.0);
    par.weight_fundamentalist * fundamentalist
        + par.weight_chartist * chartist_term
        + par.weight_random * noise
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(weight_fundamentalist: f64, weight_chartist: f64, weight_random: f64) -> TraderParams {
        TraderParams {
            horizon: 2,
            spread: 0.004,
            risk_aversion: 0.7,
            weight_fundamentalist,
            weight_chartist,
            weight_random,
        }
    }

    #[test]
    fn test_chartist_components_are_cumulative_averages() {
        // Arrange: returns in chronological order.
        let returns = [0.01, 0.02, 0.03, 0.04];

        // Act
        let components = chartist_components(&returns);

        // Assert: component k averages the last k + 1 returns.
        assert_eq!(components.len(), 4);
        assert!((components[0] - 0.04).abs() < 1e-12);
        assert!((components[1] - 0.035).abs() < 1e-12);
        assert!((components[2] - 0.03).abs() < 1e-12);
        assert!((components[3] - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_chartist_components_of_zero_history_are_zero() {
        let components = chartist_components(&[0.0; 8]);
        assert!(components.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_covariance_of_flat_window_is_noise_variance() {
        // A constant return window has zero variance, leaving only the noise
        // floor.
        let estimate = covariance_estimate(&[0.01; 10], 0.05);
        assert!((estimate - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_uses_sample_variance() {
        let estimate = covariance_estimate(&[0.0, 0.02], 0.0);
        // Sample variance of {0, 0.02} = 0.0002.
        assert!((estimate - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn test_expected_return_weights_components() {
        // Arrange: horizon 2, multiplier 1, so the fundamentalist term is
        // fundamental_component / 2.
        let par = params(0.5, 0.3, 0.2);
        let chartist = chartist_components(&[0.0, 0.04]); // [0.04, 0.02]

        // Act
        let forecast = expected_return(&par, 0.1, 1.0, &chartist, 0.01);

        // Assert: 0.5 * 0.05 + 0.3 * chartist[1] + 0.2 * 0.01
        let expected = 0.5 * 0.05 + 0.3 * 0.02 + 0.2 * 0.01;
        assert!((forecast - expected).abs() < 1e-12);
    }

    #[test]
    fn test_missing_chartist_history_contributes_zero() {
        let mut par = params(0.0, 1.0, 0.0);
        par.horizon = 50; // far beyond the available ladder
        let forecast = expected_return(&par, 0.1, 1.0, &[0.02], 0.3);
        assert_eq!(forecast, 0.0, "Absent history must read as zero, not panic.");
    }
}
