//! Per-symbol order book.
//!
//! ## Architecture
//!
//! - **Slab**: every live [`OrderEntry`], addressed by `usize` key
//! - **BookSide**: bid and ask price levels, each a FIFO chain of slab keys
//! - **HashMap**: order id to slab key, for O(1) cancel at any chain position
//!
//! ## Invariants
//!
//! - An order id is indexed at most once, on one side, at one tick
//! - Every linked entry has `available() > 0`
//! - A price level exists only while it holds at least one entry
//! - `PriceLevel::total_quantity` equals the sum of its entries' `available()`
//!
//! ## Example
//!
//! ```
//! use call_auction::orderbook::OrderBook;
//! use call_auction::types::Side;
//!
//! let mut book = OrderBook::with_capacity(100);
//! book.add(1, Side::Buy, 1_000, 1_000_000).unwrap();
//! book.add(2, Side::Buy, 500, 1_000_000).unwrap();
//!
//! assert_eq!(book.available_quantity_at(1_000_000, Side::Buy), 1_500);
//! assert!(book.add(1, Side::Sell, 10, 990_000).is_err());
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::debug;

use crate::error::BookError;
use crate::orderbook::side::{AskSide, BidSide, LevelSummary};
use crate::orderbook::{OrderEntry, PriceLevel};
use crate::types::{OrderId, Quantity, Side, Tick};

/// Limit order book for one symbol.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Order entry storage
    pub(crate) entries: Slab<OrderEntry>,

    /// Bid price levels (high to low)
    pub(crate) bids: BidSide,

    /// Ask price levels (low to high)
    pub(crate) asks: AskSide,

    /// Order id to slab key
    order_index: HashMap<OrderId, usize>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book with room for `order_capacity` entries
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            entries: Slab::with_capacity(order_capacity),
            bids: BidSide::new(),
            asks: AskSide::new(),
            order_index: HashMap::with_capacity(order_capacity),
        }
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Queue an order at `tick` behind every entry already resting there.
    ///
    /// Rejects an id that is already on the book, or a quantity the level
    /// total cannot absorb, without touching any state.
    pub fn add(
        &mut self,
        order_id: OrderId,
        side: Side,
        quantity: Quantity,
        tick: Tick,
    ) -> Result<(), BookError> {
        if self.order_index.contains_key(&order_id) {
            return Err(BookError::DuplicateOrder(order_id));
        }
        debug_assert!(quantity > 0, "order {} added with zero quantity", order_id);
        if self
            .available_quantity_at(tick, side)
            .checked_add(quantity)
            .is_none()
        {
            return Err(BookError::QuantityOverflow {
                side,
                tick,
                quantity,
            });
        }

        let key = self.entries.insert(OrderEntry::new(order_id, side, tick, quantity));
        self.order_index.insert(order_id, key);

        match side {
            Side::Buy => self.bids.insert(tick, key, &mut self.entries),
            Side::Sell => self.asks.insert(tick, key, &mut self.entries),
        }

        debug!(order_id, ?side, tick, quantity, "order entry added");
        Ok(())
    }

    /// Remove a resting order.
    ///
    /// `side` and `tick` must match where the order rests; the lookup itself
    /// goes through the id index, so no chain is scanned.
    pub fn cancel(&mut self, order_id: OrderId, side: Side, tick: Tick) -> Result<(), BookError> {
        let key = *self
            .order_index
            .get(&order_id)
            .ok_or(BookError::UnknownOrder(order_id))?;

        if self.level(side, tick).is_none() {
            return Err(BookError::LevelNotFound { side, tick });
        }

        let entry = &self.entries[key];
        if entry.side() != side || entry.tick() != tick {
            return Err(BookError::OrderNotAtLevel {
                order_id,
                side,
                tick,
            });
        }

        let removed = self.remove_entry(key);
        debug!(
            order_id,
            ?side,
            tick,
            available = removed.available(),
            "order entry cancelled"
        );
        Ok(())
    }

    /// Unlink an entry from its level and drop it from the slab and index.
    pub(crate) fn remove_entry(&mut self, key: usize) -> OrderEntry {
        let (order_id, side, tick) = {
            let entry = &self.entries[key];
            (entry.order_id(), entry.side(), entry.tick())
        };

        match side {
            Side::Buy => self.bids.unlink(tick, key, &mut self.entries),
            Side::Sell => self.asks.unlink(tick, key, &mut self.entries),
        };

        self.order_index.remove(&order_id);
        self.entries.remove(key)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Total available quantity resting at `tick`; 0 if there is no level.
    pub fn available_quantity_at(&self, tick: Tick, side: Side) -> Quantity {
        self.level(side, tick).map_or(0, |level| level.total_quantity)
    }

    /// Live ticks of one side, most aggressive first.
    ///
    /// Bids descend, asks ascend.
    pub fn ticks(&self, side: Side) -> Vec<Tick> {
        match side {
            Side::Buy => self.bids.ticks().collect(),
            Side::Sell => self.asks.ticks().collect(),
        }
    }

    /// Depth snapshot of one side, most aggressive first.
    pub fn levels(&self, side: Side) -> Vec<LevelSummary> {
        match side {
            Side::Buy => self.bids.levels().map(LevelSummary::from).collect(),
            Side::Sell => self.asks.levels().map(LevelSummary::from).collect(),
        }
    }

    /// Order ids queued at `tick`, in time priority.
    pub fn chain(&self, tick: Tick, side: Side) -> Vec<OrderId> {
        self.level(side, tick)
            .map(|level| {
                level
                    .keys(&self.entries)
                    .map(|(_, entry)| entry.order_id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The price level at `tick` on `side`
    pub fn level(&self, side: Side, tick: Tick) -> Option<&PriceLevel> {
        match side {
            Side::Buy => self.bids.level(tick),
            Side::Sell => self.asks.level(tick),
        }
    }

    /// Live state of a resting order
    #[inline]
    pub fn entry(&self, order_id: OrderId) -> Option<&OrderEntry> {
        self.order_index
            .get(&order_id)
            .map(|&key| &self.entries[key])
    }

    #[inline]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Highest bid tick
    #[inline]
    pub fn best_bid(&self) -> Option<Tick> {
        self.bids.best().map(|level| level.tick)
    }

    /// Lowest ask tick
    #[inline]
    pub fn best_ask(&self) -> Option<Tick> {
        self.asks.best().map(|level| level.tick)
    }

    /// Get the total number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.level_count()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.level_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 digest of every resting entry in priority order.
    ///
    /// Bids then asks; per level the side, tick and entry count; per entry
    /// its id, quantity and cumulative fill. Slab keys and arrival times
    /// are not hashed, so two books built from the same operations agree.
    pub fn compute_state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        let sides = [
            (Side::Buy, self.bids.levels().collect::<Vec<_>>()),
            (Side::Sell, self.asks.levels().collect::<Vec<_>>()),
        ];
        for (side, levels) in sides {
            for level in levels {
                hasher.update([side.to_u8()]);
                hasher.update(level.tick.to_le_bytes());
                hasher.update((level.order_count as u64).to_le_bytes());
                for (_, entry) in level.keys(&self.entries) {
                    hasher.update(entry.order_id().to_le_bytes());
                    hasher.update(entry.quantity().to_le_bytes());
                    hasher.update(entry.cumulative_filled().to_le_bytes());
                }
            }
        }

        let result = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
