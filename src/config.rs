// src/config.rs

//! Run configuration. One fixed record per simulation run; the engine
//! validates bounds once at start-up and never revisits them.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Parameters of a single simulation run.
///
/// Out-of-range *values* (as opposed to malformed bounds) are deliberately not
/// guarded: a huge `std_noise` or a tiny `fundamental_value` propagates into
/// numerically degenerate histories, which downstream statistics are expected
/// to cope with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of traders activated each tick, sampled without replacement.
    pub trader_sample_size: usize,
    pub n_traders: usize,
    /// Shares each trader starts with.
    pub init_stocks: u64,
    pub ticks: usize,
    pub fundamental_value: f64,
    pub base_risk_aversion: f64,
    /// Upper bound of the per-trader execution-noise spread.
    pub spread_max: f64,
    /// Maximum sampling horizon; also the length of the zero-seeded return
    /// history traders read before real returns exist.
    pub horizon: usize,
    /// Lower bound of the per-trader horizon draw.
    pub min_horizon: usize,
    pub std_noise: f64,
    /// Weight every trader puts on its noise component.
    pub w_random: f64,
    pub fundamentalist_horizon_multiplier: f64,
    /// Probability that a trader is a chartist rather than a fundamentalist.
    pub strat_share_chartists: f64,
    /// Mean-reversion speed of the Ornstein-Uhlenbeck fundamental process.
    /// Ignored by the default constant-fundamental run.
    pub mean_reversion: f64,
    /// Innovation std of the Ornstein-Uhlenbeck fundamental process.
    pub std_fundamental: f64,
    /// Carried for the calibration layers; the engine drains matching
    /// exhaustively after every submission and does not consume it.
    pub trades_per_tick: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        // Baseline parameter set from the reference calibration run.
        Self {
            trader_sample_size: 10,
            n_traders: 100,
            init_stocks: 81,
            ticks: 120,
            fundamental_value: 1112.2356754564078,
            base_risk_aversion: 0.7,
            spread_max: 0.004087,
            horizon: 212,
            min_horizon: 10,
            std_noise: 0.05149715506250338,
            w_random: 0.1,
            fundamentalist_horizon_multiplier: 1.0,
            strat_share_chartists: 0.90,
            mean_reversion: 0.0,
            std_fundamental: 0.0,
            trades_per_tick: 1,
        }
    }
}

impl ModelConfig {
    /// Checks structural bounds only. Fatal at run start, never recovered.
    pub fn validate(&self) -> Result<()> {
        if self.n_traders == 0 {
            return Err(SimError::Config("n_traders must be positive".into()));
        }
        if self.trader_sample_size > self.n_traders {
            return Err(SimError::Config(format!(
                "trader_sample_size {} exceeds n_traders {}",
                self.trader_sample_size, self.n_traders
            )));
        }
        if self.horizon == 0 {
            return Err(SimError::Config("horizon must be positive".into()));
        }
        if self.min_horizon == 0 || self.min_horizon > self.horizon {
            return Err(SimError::Config(format!(
                "min_horizon {} must lie in 1..=horizon ({})",
                self.min_horizon, self.horizon
            )));
        }
        if !(self.spread_max > 0.0) {
            return Err(SimError::Config("spread_max must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.strat_share_chartists) {
            return Err(SimError::Config(
                "strat_share_chartists must be a probability".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.w_random) {
            return Err(SimError::Config("w_random must lie in [0, 1]".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sample_size_cannot_exceed_population() {
        // Arrange
        let mut config = ModelConfig::default();
        config.n_traders = 5;
        config.trader_sample_size = 6;

        // Act + Assert
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_zero_sample_size_is_allowed() {
        // A tick with no active traders is a legal (if boring) configuration.
        let mut config = ModelConfig::default();
        config.trader_sample_size = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_horizon_must_not_exceed_horizon() {
        let mut config = ModelConfig::default();
        config.min_horizon = config.horizon + 1;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        // Arrange
        let config = ModelConfig::default();

        // Act
        let json = serde_json::to_string(&config).unwrap();
        let back: ModelConfig = serde_json::from_str(&json).unwrap();

        // Assert
        assert_eq!(back.n_traders, config.n_traders);
        assert_eq!(back.fundamental_value, config.fundamental_value);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ModelConfig = serde_json::from_str(r#"{"ticks": 7}"#).unwrap();
        assert_eq!(config.ticks, 7);
        assert_eq!(config.n_traders, ModelConfig::default().n_traders);
    }
}
