//! Price level management for entries at the same tick.
//!
//! ## Design
//!
//! A `PriceLevel` represents all entries resting at a single tick on one
//! side. Entries are maintained in a doubly-linked list for FIFO ordering
//! (price-time priority).
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> entry2 <-> entry3 <-> tail (newest)
//! ```
//!
//! - New entries are appended at the tail
//! - Execution consumes entries from the head
//! - Any entry can be removed in O(1) using the slab key

use slab::Slab;

use crate::orderbook::OrderEntry;
use crate::types::{Quantity, Tick};

/// A price level containing entries at a single tick.
///
/// The entry data lives in the slab; this struct only holds the queue
/// metadata and the level's aggregate available quantity.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Tick for this level
    pub tick: Tick,

    /// Sum of `available()` over every entry in the queue.
    /// Updated when entries are added, removed or filled
    pub total_quantity: Quantity,

    /// Head of the queue (oldest entry, slab key)
    pub head: Option<usize>,

    /// Tail of the queue (newest entry, slab key)
    pub tail: Option<usize>,

    /// Number of entries at this level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an entry to the tail of the queue
    ///
    /// # Panics
    ///
    /// Panics if the key (or the current tail) doesn't exist in the slab
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderEntry>) {
        let entry = slab.get_mut(key).expect("Invalid slab key");
        let quantity = entry.available();

        entry.prev = self.tail;
        entry.next = None;

        if let Some(tail_key) = self.tail {
            let tail_entry = slab.get_mut(tail_key).expect("Invalid tail key");
            tail_entry.next = Some(key);
        } else {
            // Empty list - this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity += quantity;
    }

    /// Unlink an entry from the queue by slab key
    ///
    /// The entry stays in the slab; the caller owns its removal.
    ///
    /// # Returns
    ///
    /// The available quantity the entry still had
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderEntry>) -> Quantity {
        let entry = slab.get(key).expect("Invalid slab key");
        let quantity = entry.available();
        let prev_key = entry.prev;
        let next_key = entry.next;

        if let Some(prev) = prev_key {
            slab.get_mut(prev).expect("Invalid prev key").next = next_key;
        } else {
            self.head = next_key;
        }

        if let Some(next) = next_key {
            slab.get_mut(next).expect("Invalid next key").prev = prev_key;
        } else {
            self.tail = prev_key;
        }

        let entry = slab.get_mut(key).expect("Invalid slab key");
        entry.prev = None;
        entry.next = None;

        self.order_count -= 1;
        self.total_quantity -= quantity;

        quantity
    }

    /// Get the head entry's slab key (oldest entry)
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Update the total quantity after a fill that left the entry resting
    pub fn reduce_quantity(&mut self, filled_quantity: Quantity) {
        self.total_quantity -= filled_quantity;
    }

    /// Slab keys from head to tail
    pub fn keys<'a>(&self, slab: &'a Slab<OrderEntry>) -> ChainIter<'a> {
        ChainIter {
            slab,
            cursor: self.head,
        }
    }
}

/// Walks a level's chain from head to tail.
pub struct ChainIter<'a> {
    slab: &'a Slab<OrderEntry>,
    cursor: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (usize, &'a OrderEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let entry = self.slab.get(key).expect("chain points past the slab");
        self.cursor = entry.next;
        Some((key, entry))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
