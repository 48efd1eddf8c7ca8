// src/market.rs

//! The per-tick simulation loop: roll histories forward, sample active
//! traders, form forecasts, quote, match, settle, cleanse.

use crate::agents::expectations::{chartist_components, covariance_estimate, expected_return};
use crate::agents::trader::Trader;
use crate::config::ModelConfig;
use crate::error::{Result, SimError};
use crate::init::init_traders;
use crate::portfolio::{MeanVariance, PortfolioOptimizer};
use crate::simulators::fundamental::{ConstantFundamental, FundamentalProcess};
use crate::simulators::order_book::OrderBook;
use crate::types::order::{Price, Side};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::{debug, error, info, warn};

/// The simulation engine. Owns the world state (traders and order book), the
/// seeded random stream, and the two external collaborators (portfolio
/// optimizer and fundamental process).
///
/// Strictly sequential: a tick fully completes before the next begins, and
/// active traders are processed in sampled order, so trader i's fills change
/// the book trader i+1 sees. That interleaving is load-bearing for
/// reproducibility.
pub struct Market {
    config: ModelConfig,
    pub traders: Vec<Trader>,
    pub order_book: OrderBook,
    /// Trader ids sorted by current wealth, descending. Recomputed every tick
    /// for inspection; matching never reads it.
    pub traders_by_wealth: Vec<usize>,
    optimizer: Box<dyn PortfolioOptimizer>,
    fundamental: Box<dyn FundamentalProcess>,
    rng: StdRng,
    seed: u64,
    tick: usize,
}

impl Market {
    /// Builds a market with the default collaborators: mean-variance
    /// portfolio weights and a constant fundamental.
    pub fn new(config: ModelConfig, seed: u64) -> Result<Self> {
        Self::with_collaborators(
            config,
            seed,
            Box::new(MeanVariance),
            Box::new(ConstantFundamental),
        )
    }

    pub fn with_collaborators(
        config: ModelConfig,
        seed: u64,
        optimizer: Box<dyn PortfolioOptimizer>,
        fundamental: Box<dyn FundamentalProcess>,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let traders = init_traders(&config, &mut rng);
        let mut order_book = OrderBook::new(config.fundamental_value, config.horizon);
        // Synthetic close for the tick before the first one, so the first
        // tick's return has a reference point.
        order_book.tick_close_price.push(config.fundamental_value);
        let traders_by_wealth = (0..traders.len()).collect();

        Ok(Self {
            config,
            traders,
            order_book,
            traders_by_wealth,
            optimizer,
            fundamental,
            rng,
            seed,
            tick: 0,
        })
    }

    /// Runs the configured number of ticks. On error the run stops fast; the
    /// histories built so far stay inspectable on `self`.
    pub fn run(&mut self) -> Result<()> {
        info!(seed = self.seed, ticks = self.config.ticks, "start of simulation");
        for _ in 0..self.config.ticks {
            self.step()?;
        }
        info!(
            seed = self.seed,
            last_close = self.order_book.last_close(),
            "simulation finished"
        );
        Ok(())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn current_tick(&self) -> usize {
        self.tick
    }

    /// Advances the simulation by exactly one tick.
    pub fn step(&mut self) -> Result<()> {
        let tick = self.tick;

        // (a) roll every trader's histories forward, active or not, valued at
        // the previous close and fundamental.
        let close = self.order_book.last_close();
        let fundamental_prev = self.order_book.last_fundamental();
        for trader in &mut self.traders {
            trader.roll_forward(close, fundamental_prev);
        }

        // (b) wealth ordering, kept for inspection parity; matching does not
        // read it.
        self.traders_by_wealth.sort_by(|&a, &b| {
            self.traders[b]
                .wealth_now()
                .total_cmp(&self.traders[a].wealth_now())
        });

        // (c) advance the fundamental.
        let fundamental_now = self.fundamental.step(fundamental_prev, &mut self.rng);
        self.order_book.fundamental.push(fundamental_now);

        // (d) sample this tick's active traders, uniformly without
        // replacement; the sampled order is the processing order.
        let mut ids: Vec<usize> = (0..self.traders.len()).collect();
        let (sampled, _) = ids.partial_shuffle(&mut self.rng, self.config.trader_sample_size);
        let active: Vec<usize> = sampled.to_vec();

        // (e) tick-shared forecast inputs.
        let mid_price = self.order_book.mid_price();
        if !(mid_price > 0.0) {
            warn!(tick, mid_price, "non-positive mid price, forecasts degenerate to NaN");
        }
        let fundamental_component = (fundamental_now / mid_price).ln();
        let previous_close = self.order_book.previous_close();
        self.order_book
            .set_current_return((mid_price - previous_close) / previous_close);
        let chartist = chartist_components(&self.order_book.returns);

        // (f) forecast, quote, match and settle, one active trader at a time.
        for &idx in &active {
            self.quote_and_match(idx, tick, mid_price, fundamental_component, &chartist)?;
        }

        // (g) cleanse the book and append this tick's history entries; then
        // restate every trader's wealth at the new close so the wealth
        // identity holds at each index.
        let close_now = self.order_book.mid_price();
        self.order_book.cleanse_book(close_now);
        for trader in &mut self.traders {
            trader.finalize_tick(close_now, fundamental_now);
        }

        self.tick += 1;
        Ok(())
    }

    /// Runs one active trader's activation: cancel stale quotes, form the
    /// forecast, size the order, submit it and drain the matching loop.
    fn quote_and_match(
        &mut self,
        idx: usize,
        tick: usize,
        mid_price: f64,
        fundamental_component: f64,
        chartist: &[f64],
    ) -> Result<()> {
        // Stale quotes never carry over: re-quote from scratch.
        let handles = std::mem::take(&mut self.traders[idx].active_orders);
        for id in handles {
            self.order_book.cancel(id);
        }

        let noise: f64 = self.config.std_noise * self.rng.sample::<f64, _>(StandardNormal);
        let forecast_return = expected_return(
            &self.traders[idx].par,
            fundamental_component,
            self.config.fundamentalist_horizon_multiplier,
            chartist,
            noise,
        );
        let forecast_price = mid_price * forecast_return.exp();

        let horizon = self.traders[idx].par.horizon;
        let window_start = self.order_book.returns.len().saturating_sub(horizon);
        let covariance =
            covariance_estimate(&self.order_book.returns[window_start..], self.config.std_noise);

        let trader = &mut self.traders[idx];
        trader.expected_return = forecast_return;
        trader.covariance = covariance;

        let target_weight = self.optimizer.target_stock_weight(
            forecast_return,
            covariance,
            trader.par.risk_aversion,
            trader.wealth_now(),
        );
        if !target_weight.is_finite() {
            error!(
                trader = idx,
                tick, target_weight, "portfolio optimizer returned a non-finite weight"
            );
            return Err(SimError::PortfolioOptimizer { trader: idx, tick });
        }

        // Execution noise around the forecast, then signed volume from the
        // desired position change. A zero (or non-finite) price yields zero
        // volume instead of a division blow-up.
        let jitter: f64 = self.rng.sample(StandardNormal);
        let order_price = forecast_price + self.traders[idx].par.spread * jitter;
        let stocks_now = self.traders[idx].stocks_now() as f64;
        let stock_value = stocks_now * order_price;
        let position_change =
            target_weight * (stock_value + self.traders[idx].money_now()) - stock_value;
        let volume: i64 = if order_price == 0.0 || !order_price.is_finite() {
            0
        } else {
            (position_change / order_price) as i64
        };

        if volume != 0 {
            if let Some(limit) = Price::new(order_price) {
                let side = if volume > 0 { Side::Bid } else { Side::Ask };
                let id = self
                    .order_book
                    .submit(side, limit, volume.unsigned_abs(), idx, tick);
                self.traders[idx].active_orders.push(id);
            }
        }

        // Drain every crossing this quote introduced and settle both sides.
        while let Some(fill) = self.order_book.match_one() {
            let notional = fill.price * fill.quantity as f64;
            self.traders[fill.ask_owner].sell(fill.quantity, notional);
            self.traders[fill.bid_owner].buy(fill.quantity, notional);
            if fill.ask_closed {
                self.traders[fill.ask_owner].drop_order(fill.ask);
            }
            if fill.bid_closed {
                self.traders[fill.bid_owner].drop_order(fill.bid);
            }
            debug!(
                tick,
                price = fill.price,
                quantity = fill.quantity,
                bid_owner = fill.bid_owner,
                ask_owner = fill.ask_owner,
                "trade"
            );
        }
        if let Some((bid, ask)) = self.order_book.crossed_prices() {
            error!(tick, bid, ask, "book crossed after match exhaustion");
            return Err(SimError::MatchingInvariant { bid, ask });
        }
        Ok(())
    }
}
