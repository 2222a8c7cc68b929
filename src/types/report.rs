//! Clearing report for one auction cycle.
//!
//! The report summarises what a clearing cycle did to one symbol's book:
//! the price and volume the algorithm chose, every fill it produced, and a
//! state root of the book afterwards.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::matching::MatchingResult;
use crate::types::{Execution, Quantity, Side};

/// Outcome of an atomic match-then-execute cycle.
///
/// ## State Root
///
/// The 32-byte state root is a SHA-256 digest of the resting book after the
/// cycle (see `OrderBook::compute_state_root`). Replaying the same orders
/// and cycles yields the same root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearingReport {
    /// Exchange-wide cycle sequence number
    pub cycle_id: u64,

    /// Symbol that was cleared
    pub symbol: String,

    /// Clearing price and volume chosen by the algorithm
    pub result: MatchingResult,

    /// Buy-side fills followed by sell-side fills
    pub executions: Vec<Execution>,

    /// Book state root after execution
    pub state_root: [u8; 32],

    /// Cycle completion time
    pub completed_at: DateTime<Utc>,
}

impl ClearingReport {
    /// True if the cycle produced no fills
    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    /// Total quantity filled on the given side of the book
    pub fn filled_quantity(&self, side: Side) -> Quantity {
        self.executions
            .iter()
            .filter(|e| e.side() == side)
            .map(|e| e.quantity)
            .sum()
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// SHA-256 over the little-endian fields of every execution, in order.
    ///
    /// Lets two replicas compare fills without shipping them.
    pub fn executions_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for exec in &self.executions {
            hasher.update(exec.execution_id.to_le_bytes());
            hasher.update(exec.order_id.to_le_bytes());
            hasher.update([exec.side_raw]);
            hasher.update(exec.price.to_le_bytes());
            hasher.update(exec.quantity.to_le_bytes());
            hasher.update([exec.execution_type_raw]);
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
