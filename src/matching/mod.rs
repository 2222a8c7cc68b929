//! Clearing-price discovery over an accumulated book.
//!
//! A [`MatchingAlgorithm`] only reads the book. Applying its result is a
//! separate step ([`OrderBook::execute`]), and the exchange runs the two
//! under one write lock so the book cannot change in between.

use std::fmt;

use crate::orderbook::OrderBook;
use crate::types::{Quantity, Tick};

mod volume;

pub use volume::VolumeMaximization;

/// Outcome of one clearing-price search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchingResult {
    pub matched: bool,
    /// Clearing tick, 0 when unmatched
    pub price: Tick,
    /// Volume each side trades at `price`, 0 when unmatched
    pub volume: Quantity,
}

impl MatchingResult {
    #[inline]
    pub fn matched(price: Tick, volume: Quantity) -> Self {
        Self {
            matched: true,
            price,
            volume,
        }
    }

    #[inline]
    pub fn unmatched() -> Self {
        Self::default()
    }
}

impl fmt::Display for MatchingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            write!(f, "volume {} at tick {}", self.volume, self.price)
        } else {
            write!(f, "no match")
        }
    }
}

/// A clearing-price rule.
pub trait MatchingAlgorithm: Send + Sync {
    /// Human-readable name, used in logs
    fn name(&self) -> &str;

    /// Search `book` for a clearing price without modifying it
    fn execute(&self, book: &OrderBook) -> MatchingResult;
}
