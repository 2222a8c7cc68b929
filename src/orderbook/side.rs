//! One side of the book: price levels ordered by aggressiveness.
//!
//! Bids and asks share a single implementation. The side's ordering policy
//! lives entirely in its [`LevelKey`] type:
//!
//! - **Bids** are keyed by `Reverse<Tick>`: highest price first
//! - **Asks** are keyed by `Tick`: lowest price first
//!
//! With that key, "the levels that would trade at clearing price `p`" is the
//! same range on both sides: every key up to and including `p`.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Debug;

use slab::Slab;

use crate::orderbook::{OrderEntry, PriceLevel};
use crate::types::{Quantity, Side, Tick};

/// Map key that orders a side's ticks from most to least aggressive.
pub trait LevelKey: Ord + Copy + Debug {
    /// The side this ordering belongs to
    const SIDE: Side;

    fn from_tick(tick: Tick) -> Self;

    fn tick(self) -> Tick;
}

/// Ask ordering: ascending ticks
impl LevelKey for Tick {
    const SIDE: Side = Side::Sell;

    #[inline]
    fn from_tick(tick: Tick) -> Self {
        tick
    }

    #[inline]
    fn tick(self) -> Tick {
        self
    }
}

/// Bid ordering: descending ticks
impl LevelKey for Reverse<Tick> {
    const SIDE: Side = Side::Buy;

    #[inline]
    fn from_tick(tick: Tick) -> Self {
        Reverse(tick)
    }

    #[inline]
    fn tick(self) -> Tick {
        self.0
    }
}

/// Bid side of a book
pub type BidSide = BookSide<Reverse<Tick>>;

/// Ask side of a book
pub type AskSide = BookSide<Tick>;

/// Aggregated view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub tick: Tick,
    /// Total available quantity at the level
    pub quantity: Quantity,
    pub order_count: usize,
}

impl From<&PriceLevel> for LevelSummary {
    fn from(level: &PriceLevel) -> Self {
        Self {
            tick: level.tick,
            quantity: level.total_quantity,
            order_count: level.order_count,
        }
    }
}

/// Price levels of one side, in priority order.
#[derive(Debug, Clone)]
pub struct BookSide<K: LevelKey> {
    levels: BTreeMap<K, PriceLevel>,
}

impl<K: LevelKey> Default for BookSide<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: LevelKey> BookSide<K> {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Number of price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The level at `tick`, if any entry rests there
    #[inline]
    pub fn level(&self, tick: Tick) -> Option<&PriceLevel> {
        self.levels.get(&K::from_tick(tick))
    }

    #[inline]
    pub(crate) fn level_mut(&mut self, tick: Tick) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&K::from_tick(tick))
    }

    /// Most aggressive level
    #[inline]
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    /// Levels from most to least aggressive
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.levels.values()
    }

    /// Ticks from most to least aggressive
    pub fn ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.levels.keys().map(|k| k.tick())
    }

    /// Levels willing to trade at `clearing_tick`, most aggressive first.
    ///
    /// Bids at or above the tick, asks at or below it.
    pub fn eligible(&self, clearing_tick: Tick) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.levels
            .range(..=K::from_tick(clearing_tick))
            .map(|(_, level)| level)
    }

    /// Append an entry (already in the slab) to the tail of its level,
    /// creating the level if this is the first entry at `tick`.
    pub(crate) fn insert(&mut self, tick: Tick, key: usize, slab: &mut Slab<OrderEntry>) {
        let level = self
            .levels
            .entry(K::from_tick(tick))
            .or_insert_with(|| PriceLevel::new(tick));
        level.push_back(key, slab);
    }

    /// Unlink an entry from its level, dropping the level once empty.
    ///
    /// # Panics
    ///
    /// Panics if no level exists at `tick`.
    pub(crate) fn unlink(&mut self, tick: Tick, key: usize, slab: &mut Slab<OrderEntry>) -> Quantity {
        let level_key = K::from_tick(tick);
        let level = self
            .levels
            .get_mut(&level_key)
            .unwrap_or_else(|| {
                panic!("unlinking from a missing {:?} level at tick {}", K::SIDE, tick)
            });
        let quantity = level.remove(key, slab);

        if level.is_empty() {
            self.levels.remove(&level_key);
        }
        quantity
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
