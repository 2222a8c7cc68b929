//! Error types.
//!
//! Rejections (bad input, identity conflicts) are returned as values and
//! never leave partial state behind. Broken internal invariants are not
//! represented here: they panic at the point of detection.

use thiserror::Error;

use crate::types::{OrderId, Quantity, Side, Tick};

/// Rejections from a single [`OrderBook`](crate::orderbook::OrderBook).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("order {0} is already on the book")]
    DuplicateOrder(OrderId),

    #[error("order {0} is not on the book")]
    UnknownOrder(OrderId),

    #[error("no {side:?} price level at tick {tick}")]
    LevelNotFound { side: Side, tick: Tick },

    #[error("order {order_id} does not rest at {side:?} tick {tick}")]
    OrderNotAtLevel {
        order_id: OrderId,
        side: Side,
        tick: Tick,
    },

    #[error("{side:?} level at tick {tick} cannot hold {quantity} more")]
    QuantityOverflow {
        side: Side,
        tick: Tick,
        quantity: Quantity,
    },
}

/// Rejections at the [`Exchange`](crate::engine::Exchange) boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("order {0}: quantity must be > 0")]
    InvalidQuantity(OrderId),

    #[error("order {0}: price must be > 0")]
    InvalidPrice(OrderId),

    #[error("order {0}: price is below one tick at the venue precision")]
    PriceBelowTick(OrderId),

    #[error("order id {0} is already registered")]
    DuplicateOrderId(OrderId),

    #[error("order {0} is not registered")]
    UnknownOrder(OrderId),

    #[error("no order book for symbol {0}")]
    UnknownSymbol(String),

    #[error(transparent)]
    Book(#[from] BookError),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("price precision {precision} exceeds maximum {max}")]
    PrecisionOutOfRange { precision: u32, max: u32 },
}
