//! Order types for the call auction.
//!
//! An [`Order`] is what a caller hands to the exchange. It carries a decimal
//! limit price; the book never sees it, only the tick derived from it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{OrderId, Quantity};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 inside SSZ-encoded executions:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid) - a higher price is more aggressive
    #[default]
    Buy,
    /// Sell order (ask) - a lower price is more aggressive
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order.
///
/// Quantity and price are not validated here; the exchange rejects
/// non-positive values on submission.
///
/// ## Example
///
/// ```
/// use std::str::FromStr;
/// use rust_decimal::Decimal;
/// use call_auction::types::{Order, Side};
///
/// let order = Order::new(1, "0005.HK", Side::Buy, 1_000, Decimal::from_str("50.25").unwrap());
/// assert_eq!(order.side, Side::Buy);
/// assert!(order.accepted_at().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique order identifier (assigned by the caller)
    pub id: OrderId,

    /// Instrument the order trades
    pub symbol: String,

    /// Buy or Sell
    pub side: Side,

    /// Requested quantity
    pub quantity: Quantity,

    /// Limit price as a decimal
    pub price: Decimal,

    /// When the exchange accepted the order; `None` until then
    accepted_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a new limit order that has not been submitted yet
    pub fn new(
        id: OrderId,
        symbol: impl Into<String>,
        side: Side,
        quantity: Quantity,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            side,
            quantity,
            price,
            accepted_at: None,
        }
    }

    /// Acceptance time, set by the exchange
    pub fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Record the acceptance time. Only the first stamp sticks.
    pub(crate) fn stamp_accepted(&mut self, at: DateTime<Utc>) {
        if self.accepted_at.is_none() {
            self.accepted_at = Some(at);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Buy.to_u8(), 0);
        assert_eq!(Side::Sell.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Buy));
        assert_eq!(Side::from_u8(1), Some(Side::Sell));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_order_new() {
        let price = Decimal::from_str("100.0004").unwrap();
        let order = Order::new(7, "0005.HK", Side::Sell, 2_000, price);

        assert_eq!(order.id, 7);
        assert_eq!(order.symbol, "0005.HK");
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.quantity, 2_000);
        assert_eq!(order.price, price);
        assert!(order.accepted_at().is_none());
    }

    #[test]
    fn test_order_stamped_once() {
        let mut order = Order::new(1, "X", Side::Buy, 10, Decimal::ONE);
        let first = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let second = Utc.timestamp_millis_opt(1_800_000_000_000).unwrap();

        order.stamp_accepted(first);
        order.stamp_accepted(second);

        assert_eq!(order.accepted_at(), Some(first));
    }
}
