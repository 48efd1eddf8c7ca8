// src/init.rs

//! Deterministic construction of the trader population from a configuration
//! and the run's seeded random stream.

use crate::agents::trader::{Trader, TraderParams};
use crate::config::ModelConfig;
use rand::rngs::StdRng;
use rand::Rng;

/// Builds the trader population. Each trader draws a horizon uniformly from
/// `[min_horizon, horizon]`, a spread from `(0, spread_max)`, and a strategy
/// identity: chartist with probability `strat_share_chartists`, otherwise
/// fundamentalist. The noise weight `w_random` is shared; the remaining
/// weight goes entirely to the drawn strategy. Initial money equals the
/// stock endowment's fundamental value (even cash/stock split).
pub fn init_traders(config: &ModelConfig, rng: &mut StdRng) -> Vec<Trader> {
    let init_money = config.init_stocks as f64 * config.fundamental_value;
    (0..config.n_traders)
        .map(|id| {
            let horizon = rng.gen_range(config.min_horizon..=config.horizon);
            let spread = rng.gen_range(0.0..config.spread_max);
            let is_chartist = rng.gen_bool(config.strat_share_chartists);
            let strategy_weight = 1.0 - config.w_random;
            let (weight_fundamentalist, weight_chartist) = if is_chartist {
                (0.0, strategy_weight)
            } else {
                (strategy_weight, 0.0)
            };
            let par = TraderParams {
                horizon,
                spread,
                risk_aversion: config.base_risk_aversion,
                weight_fundamentalist,
                weight_chartist,
                weight_random: config.w_random,
            };
            Trader::new(
                id,
                par,
                init_money,
                config.init_stocks as i64,
                config.fundamental_value,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_population_size_and_endowment() {
        // Arrange
        let config = ModelConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let traders = init_traders(&config, &mut rng);

        // Assert
        assert_eq!(traders.len(), config.n_traders);
        for trader in &traders {
            assert_eq!(trader.stocks[0], config.init_stocks as i64);
            assert_eq!(
                trader.money[0],
                config.init_stocks as f64 * config.fundamental_value
            );
            assert!(trader.par.horizon >= config.min_horizon);
            assert!(trader.par.horizon <= config.horizon);
            assert!(trader.par.spread >= 0.0 && trader.par.spread < config.spread_max);
        }
    }

    #[test]
    fn test_strategy_weights_are_exclusive() {
        let config = ModelConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for trader in init_traders(&config, &mut rng) {
            let strategy_weight = 1.0 - config.w_random;
            let chartist = trader.par.weight_chartist == strategy_weight
                && trader.par.weight_fundamentalist == 0.0;
            let fundamentalist = trader.par.weight_fundamentalist == strategy_weight
                && trader.par.weight_chartist == 0.0;
            assert!(
                chartist || fundamentalist,
                "A trader is either a chartist or a fundamentalist, never both."
            );
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let config = ModelConfig::default();
        let mut rng_a = StdRng::seed_from_u64(11);
        let mut rng_b = StdRng::seed_from_u64(11);

        let traders_a = init_traders(&config, &mut rng_a);
        let traders_b = init_traders(&config, &mut rng_b);

        for (a, b) in traders_a.iter().zip(&traders_b) {
            assert_eq!(a.par.horizon, b.par.horizon);
            assert_eq!(a.par.spread, b.par.spread);
            assert_eq!(a.par.weight_chartist, b.par.weight_chartist);
        }
    }
}
