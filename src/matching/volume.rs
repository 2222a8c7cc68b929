//! Volume-maximizing uniform-price clearing.
//!
//! For a candidate tick `p`:
//!
//! ```text
//! demand(p)  = Σ bid quantity at ticks >= p
//! supply(p)  = Σ ask quantity at ticks <= p
//! matchable  = min(demand, supply)
//! ```
//!
//! Candidates are every live tick on either side, visited high to low. The
//! best is replaced only by a strictly larger volume, so among equal volumes
//! the highest tick wins.
//!
//! Demand only grows and supply only shrinks as `p` descends, so both are
//! carried as running sums over the sorted levels instead of being
//! recomputed per candidate. The sums are `u128`: each level total fits in
//! a `Quantity`, but a whole side need not. A volume beyond `Quantity::MAX`
//! is reported as `Quantity::MAX`.

use tracing::trace;

use crate::matching::{MatchingAlgorithm, MatchingResult};
use crate::orderbook::OrderBook;
use crate::types::{Quantity, Side, Tick};

/// Picks the tick at which the most quantity changes hands.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeMaximization;

impl VolumeMaximization {
    pub const NAME: &'static str = "Volume Maximization";

    pub fn new() -> Self {
        Self
    }
}

impl MatchingAlgorithm for VolumeMaximization {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn execute(&self, book: &OrderBook) -> MatchingResult {
        // Bids arrive high to low; asks low to high, walked in reverse
        let bids: Vec<(Tick, Quantity)> = book
            .levels(Side::Buy)
            .into_iter()
            .map(|l| (l.tick, l.quantity))
            .collect();
        let asks: Vec<(Tick, Quantity)> = book
            .levels(Side::Sell)
            .into_iter()
            .rev()
            .map(|l| (l.tick, l.quantity))
            .collect();

        if bids.is_empty() || asks.is_empty() {
            return MatchingResult::unmatched();
        }

        let mut candidates: Vec<Tick> = bids.iter().chain(asks.iter()).map(|&(t, _)| t).collect();
        candidates.sort_unstable_by(|a, b| b.cmp(a));
        candidates.dedup();

        let mut demand: u128 = 0;
        let mut supply: u128 = asks.iter().map(|&(_, q)| u128::from(q)).sum();
        let (mut bid_idx, mut ask_idx) = (0, 0);
        let (mut best_volume, mut best_tick): (u128, Tick) = (0, 0);

        for tick in candidates {
            while bid_idx < bids.len() && bids[bid_idx].0 >= tick {
                demand += u128::from(bids[bid_idx].1);
                bid_idx += 1;
            }
            while ask_idx < asks.len() && asks[ask_idx].0 > tick {
                supply -= u128::from(asks[ask_idx].1);
                ask_idx += 1;
            }

            let volume = demand.min(supply);
            trace!(tick, demand, supply, volume, "clearing candidate");
            if volume > best_volume {
                best_volume = volume;
                best_tick = tick;
            }
        }

        if best_volume > 0 && best_tick > 0 {
            let volume = Quantity::try_from(best_volume).unwrap_or(Quantity::MAX);
            MatchingResult::matched(best_tick, volume)
        } else {
            MatchingResult::unmatched()
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
