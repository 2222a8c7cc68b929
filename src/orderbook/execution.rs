//! Fill walk at a clearing tick.
//!
//! Each side is walked independently from its most aggressive eligible
//! level, head to tail, until the target volume is consumed. Every fill
//! carries the clearing tick. Fully consumed entries leave the book; the
//! one entry a side may leave partially filled keeps its queue position.

use tracing::{debug, trace};

use crate::orderbook::OrderBook;
use crate::sequence::SequenceGenerator;
use crate::types::{Execution, ExecutionType, Quantity, Side, Tick};

impl OrderBook {
    /// Consume up to `target_volume` on each side at `clearing_tick`.
    ///
    /// Returns buy-side executions followed by sell-side executions, each in
    /// price-time priority. A zero tick or zero volume executes nothing.
    pub fn execute(
        &mut self,
        clearing_tick: Tick,
        target_volume: Quantity,
        ids: &SequenceGenerator,
    ) -> Vec<Execution> {
        let mut executions = Vec::new();
        if clearing_tick == 0 || target_volume == 0 {
            return executions;
        }

        let bought = self.fill_side(Side::Buy, clearing_tick, target_volume, ids, &mut executions);
        let sold = self.fill_side(Side::Sell, clearing_tick, target_volume, ids, &mut executions);

        debug!(
            clearing_tick,
            target_volume,
            bought,
            sold,
            executions = executions.len(),
            "book executed"
        );
        executions
    }

    /// Walk one side; returns the quantity actually filled.
    fn fill_side(
        &mut self,
        side: Side,
        clearing_tick: Tick,
        target_volume: Quantity,
        ids: &SequenceGenerator,
        out: &mut Vec<Execution>,
    ) -> Quantity {
        let mut remaining = target_volume;

        while remaining > 0 {
            let next = match side {
                Side::Buy => self.bids.eligible(clearing_tick).next(),
                Side::Sell => self.asks.eligible(clearing_tick).next(),
            }
            .map(|level| {
                let head = level
                    .peek_head()
                    .expect("live price level without a head entry");
                (level.tick, head)
            });

            // Eligible liquidity ran out before the target
            let Some((tick, key)) = next else { break };

            let entry = &mut self.entries[key];
            let fill = entry.available().min(remaining);
            assert!(fill > 0, "zero fill against order {}", entry.order_id());

            entry.fill(fill);
            let order_id = entry.order_id();
            let execution_type = if entry.is_filled() {
                ExecutionType::Full
            } else {
                ExecutionType::Partial
            };

            let level = match side {
                Side::Buy => self.bids.level_mut(tick),
                Side::Sell => self.asks.level_mut(tick),
            }
            .expect("entry level vanished during execution");
            level.reduce_quantity(fill);

            if execution_type == ExecutionType::Full {
                self.remove_entry(key);
            }

            trace!(order_id, ?side, tick, fill, ?execution_type, "fill");
            out.push(Execution::new(
                ids.next_id(),
                order_id,
                side,
                clearing_tick,
                fill,
                execution_type,
            ));
            remaining -= fill;
        }

        target_volume - remaining
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
