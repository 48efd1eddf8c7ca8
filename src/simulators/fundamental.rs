// src/simulators/fundamental.rs

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

/// A pluggable stochastic process for the fundamental value, advanced once
/// per tick by the simulation loop. Keeping this behind a trait means future
/// fundamental dynamics never touch the matching engine.
pub trait FundamentalProcess {
    /// Produces the next fundamental value from the current one.
    fn step(&mut self, current: f64, rng: &mut StdRng) -> f64;
}

/// The model default: the fundamental is carried forward unchanged. A
/// documented simplification, not a placeholder.
pub struct ConstantFundamental;

impl FundamentalProcess for ConstantFundamental {
    fn step(&mut self, current: f64, _rng: &mut StdRng) -> f64 {
        current
    }
}

/// Mean-reverting fundamental with Gaussian innovations.
pub struct OrnsteinUhlenbeck {
    /// Level the process reverts toward.
    pub long_run_value: f64,
    /// Reversion speed per tick, usually in [0, 1].
    pub mean_reversion: f64,
    /// Innovation standard deviation per tick.
    pub std_fundamental: f64,
}

impl FundamentalProcess for OrnsteinUhlenbeck {
    fn step(&mut self, current: f64, rng: &mut StdRng) -> f64 {
        let shock: f64 = rng.sample(StandardNormal);
        current + self.mean_reversion * (self.long_run_value - current) + self.std_fundamental * shock
    }
}
