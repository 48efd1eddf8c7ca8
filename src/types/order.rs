// src/types/order.rs

use std::cmp::Ordering;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

/// Handle to a resting order. The wrapped sequence number is allocated by the
/// book at submission and doubles as the time-priority key: lower id = earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(pub u64);

/// A finite limit price, usable as a `BTreeMap` key.
///
/// The model quotes real-valued prices (forecast plus Gaussian jitter), so the
/// book cannot key levels on an integer tick grid. Wrapping `f64` with a total
/// order is safe here because construction rejects NaN and infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    /// Returns `None` for NaN or infinite input.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Price(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        // Finite-only by construction, so total_cmp is a plain numeric order.
        self.0.total_cmp(&other.0)
    }
}

/// A resting limit order. Everything except `quantity` is fixed at creation;
/// `quantity` is decremented on partial fills and the order is removed from
/// the book once it reaches zero.
#[derive(Debug, Clone, Copy)]
pub struct Order {
    pub id: OrderId,
    pub owner: usize,
    pub side: Side,
    pub price: Price,
    pub quantity: u64,
    /// Tick at which the order was submitted.
    pub tick: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rejects_non_finite() {
        assert!(Price::new(f64::NAN).is_none());
        assert!(Price::new(f64::INFINITY).is_none());
        assert!(Price::new(f64::NEG_INFINITY).is_none());
        assert!(Price::new(1112.23).is_some());
    }

    #[test]
    fn test_price_orders_numerically() {
        // Arrange
        let lo = Price::new(-4.0).unwrap();
        let mid = Price::new(0.0).unwrap();
        let hi = Price::new(1500.5).unwrap();

        // Assert
        assert!(lo < mid && mid < hi, "Prices should sort numerically.");
        assert_eq!(Price::new(2.5), Price::new(2.5));
    }

    #[test]
    fn test_order_ids_order_by_sequence() {
        assert!(OrderId(3) < OrderId(7), "Lower sequence id is earlier.");
    }
}
