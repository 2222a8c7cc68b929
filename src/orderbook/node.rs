//! Order entries stored in the book's slab.
//!
//! ## Design
//!
//! `OrderEntry` is the live, book-internal state of one accepted order:
//! its original quantity, how much of it has been filled, and the
//! doubly-linked list pointers that place it in its price level's FIFO
//! chain.
//!
//! ## Linked List
//!
//! Entries at the same tick form a doubly-linked list:
//! - `next`: the next (newer) entry at the price level
//! - `prev`: the previous (older) entry at the price level
//!
//! Both are slab keys, not references, so any entry can be unlinked in O(1)
//! without the chain owning its neighbours.

use crate::types::{OrderId, Quantity, Side, Tick};

/// Order entry stored in the slab.
#[derive(Debug, Clone)]
pub struct OrderEntry {
    order_id: OrderId,
    side: Side,
    tick: Tick,
    quantity: Quantity,
    cumulative_filled: Quantity,

    /// Next entry in the price level queue (slab key)
    /// None if this is the tail (newest entry)
    pub(crate) next: Option<usize>,

    /// Previous entry in the price level queue (slab key)
    /// None if this is the head (oldest entry)
    pub(crate) prev: Option<usize>,
}

impl OrderEntry {
    /// Create a new, unlinked and unfilled entry
    #[inline]
    pub fn new(order_id: OrderId, side: Side, tick: Tick, quantity: Quantity) -> Self {
        Self {
            order_id,
            side,
            tick,
            quantity,
            cumulative_filled: 0,
            next: None,
            prev: None,
        }
    }

    #[inline]
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Quantity the order was accepted with
    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Quantity filled so far
    #[inline]
    pub fn cumulative_filled(&self) -> Quantity {
        self.cumulative_filled
    }

    /// Quantity still available to trade
    #[inline]
    pub fn available(&self) -> Quantity {
        self.quantity - self.cumulative_filled
    }

    /// Check if nothing is left to trade
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.cumulative_filled == self.quantity
    }

    /// Record a fill of `quantity`.
    ///
    /// # Panics
    ///
    /// Panics if `quantity` exceeds the available quantity.
    #[inline]
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.available(),
            "overfill of order {}: {} > {} available",
            self.order_id,
            quantity,
            self.available()
        );
        self.cumulative_filled += quantity;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
