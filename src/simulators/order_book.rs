// src/simulators/order_book.rs

//! Limit order book with price/time priority plus the per-tick market
//! history sequences (close price, return, traded volume, fundamental).

use crate::types::order::{Order, OrderId, Price, Side};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// One bid/ask pair crossed by `match_one`. Carries enough context for the
/// simulation loop to settle both owners and prune their handle lists.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    /// Execution price: the resting (earlier-sequence) order sets it.
    pub price: f64,
    pub quantity: u64,
    pub bid: OrderId,
    pub ask: OrderId,
    pub bid_owner: usize,
    pub ask_owner: usize,
    /// True when the bid was fully consumed and left the book.
    pub bid_closed: bool,
    /// True when the ask was fully consumed and left the book.
    pub ask_closed: bool,
}

/// FIFO queue of resting orders at a single price. Front = earliest sequence
/// number, i.e. the order with time priority at this level.
#[derive(Debug, Default)]
pub struct PriceLevel {
    pub orders: VecDeque<Order>,
}

impl PriceLevel {
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(|o| o.quantity).sum()
    }
}

/// The order book. Owns every resting order; traders only hold `OrderId`
/// handles, so fills and cancellations can never dangle.
pub struct OrderBook {
    bids: BTreeMap<Price, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
    /// Side/level lookup so cancellation does not scan the whole book.
    index: HashMap<OrderId, (Side, Price)>,
    next_sequence: u64,
    /// Sticky best-price scalars: they keep their last value when a side
    /// empties, so the mid price stays defined through thin markets.
    highest_bid_price: f64,
    lowest_ask_price: f64,
    volume_this_tick: u64,

    // Per-tick history, appended once per tick by `cleanse_book` (volume,
    // close, return placeholder) and by the simulation loop (fundamental).
    pub tick_close_price: Vec<f64>,
    pub returns: Vec<f64>,
    pub volume: Vec<u64>,
    pub fundamental: Vec<f64>,
}

impl OrderBook {
    /// An empty book. Best-price scalars and the synthetic initial close are
    /// seeded with the fundamental value; the return history is pre-seeded
    /// with `horizon` zeros so early chartist windows read zero contribution.
    pub fn new(fundamental_value: f64, horizon: usize) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
            next_sequence: 0,
            highest_bid_price: fundamental_value,
            lowest_ask_price: fundamental_value,
            volume_this_tick: 0,
            tick_close_price: vec![fundamental_value],
            returns: vec![0.0; horizon],
            volume: Vec::new(),
            fundamental: vec![fundamental_value],
        }
    }

    /// Rests a new order at its price level. Matching is never triggered
    /// here; it is a separate, explicit step.
    pub fn submit(
        &mut self,
        side: Side,
        price: Price,
        quantity: u64,
        owner: usize,
        tick: usize,
    ) -> OrderId {
        debug_assert!(quantity > 0, "orders must carry positive quantity");
        let id = OrderId(self.next_sequence);
        self.next_sequence += 1;

        let order = Order {
            id,
            owner,
            side,
            price,
            quantity,
            tick,
        };
        let book_side = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        book_side.entry(price).or_default().orders.push_back(order);
        self.index.insert(id, (side, price));
        self.refresh_best_prices();
        id
    }

    /// Removes a resting order. Cancelling an order that has already been
    /// fully matched is a no-op, not an error: the handle simply signals
    /// "already settled".
    pub fn cancel(&mut self, id: OrderId) {
        let Some((side, price)) = self.index.remove(&id) else {
            return;
        };
        let book_side = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        if let Some(level) = book_side.get_mut(&price) {
            if let Some(pos) = level.orders.iter().position(|o| o.id == id) {
                level.orders.remove(pos);
            }
            if level.orders.is_empty() {
                book_side.remove(&price);
            }
        }
        self.refresh_best_prices();
    }

    /// Crosses the best bid against the best ask, if they overlap.
    ///
    /// Price priority picks the levels; FIFO order within a level gives time
    /// priority. The trade executes at the price of whichever order has the
    /// earlier sequence number (the order that was in the book first), and
    /// trades `min` of the two quantities. Callers drain the book by looping
    /// until this returns `None`.
    pub fn match_one(&mut self) -> Option<Fill> {
        let (&bid_price, _) = self.bids.iter().next_back()?;
        let (&ask_price, _) = self.asks.iter().next()?;
        if bid_price < ask_price {
            return None;
        }

        let bid_level = self.bids.get_mut(&bid_price)?;
        let ask_level = self.asks.get_mut(&ask_price)?;
        let bid = bid_level.orders.front_mut()?;
        let ask = ask_level.orders.front_mut()?;

        let price = if bid.id < ask.id { bid.price } else { ask.price };
        let quantity = bid.quantity.min(ask.quantity);
        bid.quantity -= quantity;
        ask.quantity -= quantity;

        let fill = Fill {
            price: price.value(),
            quantity,
            bid: bid.id,
            ask: ask.id,
            bid_owner: bid.owner,
            ask_owner: ask.owner,
            bid_closed: bid.quantity == 0,
            ask_closed: ask.quantity == 0,
        };

        if fill.bid_closed {
            bid_level.orders.pop_front();
            self.index.remove(&fill.bid);
            if bid_level.orders.is_empty() {
                self.bids.remove(&bid_price);
            }
        }
        if fill.ask_closed {
            ask_level.orders.pop_front();
            self.index.remove(&fill.ask);
            if ask_level.orders.is_empty() {
                self.asks.remove(&ask_price);
            }
        }

        self.volume_this_tick += quantity;
        self.refresh_best_prices();
        Some(fill)
    }

    /// End-of-tick bookkeeping: drop empty price levels (resting unmatched
    /// orders stay), then append this tick's close price, a return slot for
    /// the next tick to overwrite, and the traded volume.
    pub fn cleanse_book(&mut self, close_price: f64) {
        self.bids.retain(|_, level| !level.orders.is_empty());
        self.asks.retain(|_, level| !level.orders.is_empty());
        self.refresh_best_prices();

        self.tick_close_price.push(close_price);
        self.returns.push(0.0);
        self.volume.push(self.volume_this_tick);
        self.volume_this_tick = 0;
    }

    /// Overwrites the current (placeholder) return entry. Called once at the
    /// start of every tick with the mid-vs-previous-close simple return.
    pub fn set_current_return(&mut self, value: f64) {
        if let Some(last) = self.returns.last_mut() {
            *last = value;
        }
    }

    pub fn highest_bid_price(&self) -> f64 {
        self.highest_bid_price
    }

    pub fn lowest_ask_price(&self) -> f64 {
        self.lowest_ask_price
    }

    /// Arithmetic mean of the best bid and best ask scalars.
    pub fn mid_price(&self) -> f64 {
        0.5 * (self.highest_bid_price + self.lowest_ask_price)
    }

    pub fn last_close(&self) -> f64 {
        self.tick_close_price.last().copied().unwrap_or(f64::NAN)
    }

    /// Close price of the tick before the current one.
    pub fn previous_close(&self) -> f64 {
        let n = self.tick_close_price.len();
        if n >= 2 {
            self.tick_close_price[n - 2]
        } else {
            f64::NAN
        }
    }

    pub fn last_fundamental(&self) -> f64 {
        self.fundamental.last().copied().unwrap_or(f64::NAN)
    }

    /// Returns the crossing pair of actual level prices if the book is still
    /// crossed. After exhaustive matching this must be `None`; anything else
    /// is an internal-consistency bug.
    pub fn crossed_prices(&self) -> Option<(f64, f64)> {
        let (&bid, _) = self.bids.iter().next_back()?;
        let (&ask, _) = self.asks.iter().next()?;
        if bid >= ask {
            Some((bid.value(), ask.value()))
        } else {
            None
        }
    }

    /// Whether an order is still resting (i.e. neither filled nor cancelled).
    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn bid_depth(&self) -> usize {
        self.bids.values().map(|l| l.orders.len()).sum()
    }

    pub fn ask_depth(&self) -> usize {
        self.asks.values().map(|l| l.orders.len()).sum()
    }

    fn refresh_best_prices(&mut self) {
        if let Some((&price, _)) = self.bids.iter().next_back() {
            self.highest_bid_price = price.value();
        }
        if let Some((&price, _)) = self.asks.iter().next() {
            self.lowest_ask_price = price.value();
        }
    }
}
