// src/agents/trader.rs

use crate::types::order::OrderId;

/// Behavioral parameters, fixed for the whole run at initialization.
#[derive(Debug, Clone, Copy)]
pub struct TraderParams {
    /// Sampling horizon: how many trailing returns the trader looks at.
    pub horizon: usize,
    /// Std of the Gaussian execution noise around the forecast price.
    pub spread: f64,
    pub risk_aversion: f64,
    pub weight_fundamentalist: f64,
    pub weight_chartist: f64,
    pub weight_random: f64,
}

/// A trader: financial state as append-only per-tick histories plus the
/// handles of its currently resting orders.
///
/// Money and stocks must only change through `buy`/`sell` settlement (or
/// initialization); any other mutation is a bug. Negative money and short
/// stock positions are permitted by design — no balance checks anywhere.
#[derive(Debug, Clone)]
pub struct Trader {
    pub id: usize,
    pub par: TraderParams,
    /// One entry per tick, index = tick (plus the initial entry).
    pub money: Vec<f64>,
    pub stocks: Vec<i64>,
    pub wealth: Vec<f64>,
    pub real_wealth: Vec<f64>,
    /// Non-owning handles to this trader's resting orders. The book owns the
    /// orders themselves.
    pub active_orders: Vec<OrderId>,
    /// Latest covariance estimate over the trailing return window.
    pub covariance: f64,
    /// Latest forecast return.
    pub expected_return: f64,
}

impl Trader {
    pub fn new(
        id: usize,
        par: TraderParams,
        init_money: f64,
        init_stocks: i64,
        fundamental_value: f64,
    ) -> Self {
        let wealth = init_money + init_stocks as f64 * fundamental_value;
        Self {
            id,
            par,
            money: vec![init_money],
            stocks: vec![init_stocks],
            wealth: vec![wealth],
            real_wealth: vec![wealth],
            active_orders: Vec::new(),
            covariance: 0.0,
            expected_return: 0.0,
        }
    }

    /// Appends exactly one entry to every history sequence, carrying the
    /// previous money/stocks values forward. Called once per tick for every
    /// trader, active or not.
    pub fn roll_forward(&mut self, close_price: f64, fundamental: f64) {
        let money = self.money_now();
        let stocks = self.stocks_now();
        self.money.push(money);
        self.stocks.push(stocks);
        self.wealth.push(money + stocks as f64 * close_price);
        self.real_wealth.push(money + stocks as f64 * fundamental);
    }

    /// Settles the buy side of a fill: stocks up, money down. Mutates the
    /// current (last) history slot, never appends.
    pub fn buy(&mut self, quantity: u64, cost: f64) {
        if let Some(stocks) = self.stocks.last_mut() {
            *stocks += quantity as i64;
        }
        if let Some(money) = self.money.last_mut() {
            *money -= cost;
        }
    }

    /// Settles the sell side of a fill: stocks down, money up.
    pub fn sell(&mut self, quantity: u64, proceeds: f64) {
        if let Some(stocks) = self.stocks.last_mut() {
            *stocks -= quantity as i64;
        }
        if let Some(money) = self.money.last_mut() {
            *money += proceeds;
        }
    }

    /// Recomputes this tick's wealth entries from the settled money/stocks
    /// and the just-appended close and fundamental, so that
    /// `wealth[t] == money[t] + stocks[t] * close[t]` holds at every index.
    pub fn finalize_tick(&mut self, close_price: f64, fundamental: f64) {
        let money = self.money_now();
        let stocks = self.stocks_now() as f64;
        if let Some(wealth) = self.wealth.last_mut() {
            *wealth = money + stocks * close_price;
        }
        if let Some(real_wealth) = self.real_wealth.last_mut() {
            *real_wealth = money + stocks * fundamental;
        }
    }

    /// Drops a handle after the corresponding order left the book.
    pub fn drop_order(&mut self, id: OrderId) {
        self.active_orders.retain(|&handle| handle != id);
    }

    pub fn money_now(&self) -> f64 {
        self.money.last().copied().unwrap_or(f64::NAN)
    }

    pub fn stocks_now(&self) -> i64 {
        self.stocks.last().copied().unwrap_or(0)
    }

    pub fn wealth_now(&self) -> f64 {
        self.wealth.last().copied().unwrap_or(f64::NAN)
    }
}

// -----------------------------------------------------------------------------
//  Unit Tests
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    fn test_trader() -> Trader {
        let par = TraderParams {
            horizon: 8,
            spread: 0.004,
            risk_aversion: 0.7,
            weight_fundamentalist: 0.9,
            weight_chartist: 0.0,
            weight_random: 0.1,
        };
        Trader::new(0, par, 1000.0, 10, 100.0)
    }

    #[test]
    fn test_new_trader_histories_have_length_one() {
        let trader = test_trader();
        assert_eq!(trader.money.len(), 1);
        assert_eq!(trader.stocks.len(), 1);
        assert_eq!(trader.wealth.len(), 1);
        assert_eq!(trader.real_wealth.len(), 1);
        assert_eq!(trader.wealth[0], 2000.0, "1000 money + 10 x 100 stock value.");
    }

    #[test]
    fn test_roll_forward_appends_exactly_one_entry() {
        // Arrange
        let mut trader = test_trader();

        // Act
        trader.roll_forward(110.0, 100.0);

        // Assert
        assert_eq!(trader.money.len(), 2);
        assert_eq!(trader.money[1], trader.money[0]);
        assert_eq!(trader.stocks[1], trader.stocks[0]);
        assert_eq!(trader.wealth[1], 1000.0 + 10.0 * 110.0);
        assert_eq!(trader.real_wealth[1], 1000.0 + 10.0 * 100.0);
    }

    #[test]
    fn test_buy_mutates_current_slot_only() {
        // Arrange
        let mut trader = test_trader();
        trader.roll_forward(100.0, 100.0);

        // Act
        trader.buy(4, 400.0);

        // Assert: the initial entry is untouched, the current one settled.
        assert_eq!(trader.stocks[0], 10);
        assert_eq!(trader.money[0], 1000.0);
        assert_eq!(trader.stocks[1], 14);
        assert_eq!(trader.money[1], 600.0);
        assert_eq!(trader.money.len(), 2, "Settlement never appends.");
    }

    #[test]
    fn test_sell_can_short_below_zero() {
        // Shorting is permitted by design; no balance check may interfere.
        let mut trader = test_trader();
        trader.sell(25, 2500.0);
        assert_eq!(trader.stocks_now(), -15);
        assert_eq!(trader.money_now(), 3500.0);
    }

    #[test]
    fn test_finalize_tick_restores_wealth_identity() {
        // Arrange: roll forward, then trade at a price away from the close.
        let mut trader = test_trader();
        trader.roll_forward(100.0, 100.0);
        trader.buy(5, 520.0);

        // Act
        trader.finalize_tick(104.0, 100.0);

        // Assert
        let expected = trader.money_now() + trader.stocks_now() as f64 * 104.0;
        assert_eq!(trader.wealth_now(), expected);
    }

    #[test]
    fn test_drop_order_removes_only_that_handle() {
        let mut trader = test_trader();
        trader.active_orders = vec![OrderId(1), OrderId(2), OrderId(3)];
        trader.drop_order(OrderId(2));
        assert_eq!(trader.active_orders, vec![OrderId(1), OrderId(3)]);
    }
}
