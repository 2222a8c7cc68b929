//! Execution records produced by a clearing cycle.
//!
//! ## SSZ Serialization
//!
//! Executions are serialized using SSZ for deterministic encoding, so two
//! venues replaying the same cycle produce byte-identical fill records.

use ssz_rs::prelude::*;

use crate::types::{OrderId, Quantity, Side, Tick};

/// Whether a fill exhausted the resting order or only reduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionType {
    /// The fill consumed all remaining available quantity
    #[default]
    Full,
    /// Quantity remains resting after the fill
    Partial,
}

impl ExecutionType {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            ExecutionType::Full => 0,
            ExecutionType::Partial => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ExecutionType::Full),
            1 => Some(ExecutionType::Partial),
            _ => None,
        }
    }
}

/// One fill against one resting order.
///
/// ## Price
///
/// Every execution of a cycle carries the single clearing tick, regardless
/// of the resting order's own limit (uniform-price auction).
///
/// ## Example
///
/// ```
/// use call_auction::types::{Execution, ExecutionType, Side};
///
/// let exec = Execution::new(1, 42, Side::Buy, 1_000_000, 500, ExecutionType::Partial);
/// assert_eq!(exec.execution_type(), ExecutionType::Partial);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Execution {
    /// Venue-global, monotonically increasing identifier
    pub execution_id: u64,

    /// Order that was filled
    pub order_id: OrderId,

    /// Side of the filled order as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Clearing tick
    pub price: Tick,

    /// Filled quantity, always > 0
    pub quantity: Quantity,

    /// Execution type as u8 (0=Full, 1=Partial)
    pub execution_type_raw: u8,
}

impl Execution {
    /// Create a new execution record
    ///
    /// # Panics
    ///
    /// Panics if `quantity` or `price` is zero. Either means the fill walk
    /// has corrupted book state and the trade must not be published.
    pub fn new(
        execution_id: u64,
        order_id: OrderId,
        side: Side,
        price: Tick,
        quantity: Quantity,
        execution_type: ExecutionType,
    ) -> Self {
        assert!(quantity > 0, "execution quantity must be > 0 (order {})", order_id);
        assert!(price > 0, "execution price must be > 0 (order {})", order_id);

        Self {
            execution_id,
            order_id,
            side_raw: side.to_u8(),
            price,
            quantity,
            execution_type_raw: execution_type.to_u8(),
        }
    }

    /// Get the side of the filled order
    ///
    /// # Panics
    ///
    /// Panics if `side_raw` is not a valid side byte.
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or_else(|| {
            panic!(
                "execution {} carries side byte {}",
                self.execution_id, self.side_raw
            )
        })
    }

    /// Get the execution type
    ///
    /// # Panics
    ///
    /// Panics if `execution_type_raw` is not a valid execution type byte.
    pub fn execution_type(&self) -> ExecutionType {
        ExecutionType::from_u8(self.execution_type_raw).unwrap_or_else(|| {
            panic!(
                "execution {} carries execution type byte {}",
                self.execution_id, self.execution_type_raw
            )
        })
    }

    /// True when the fill removed the order from the book
    pub fn is_full(&self) -> bool {
        self.execution_type() == ExecutionType::Full
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
