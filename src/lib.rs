//! # Call Auction
//!
//! Single-venue limit order book with uniform-price call auction clearing.
//!
//! ## Architecture
//!
//! - **Types**: Order, Execution, ClearingReport, fixed-point prices
//! - **OrderBook**: per-symbol book with slab-based entry storage
//! - **Matching**: clearing-price search (volume maximization)
//! - **Engine**: exchange that validates, routes and clears orders
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same orders and cycles produce the same fills and
//!    the same book state root
//! 2. **No Floating Point**: prices are decimals converted once into integer
//!    ticks; books only ever compare ticks
//! 3. **Discrete Auction**: nothing trades on arrival; a clearing cycle
//!    prices the accumulated book and executes everything at one price
//! 4. **Single Writer per Symbol**: each book has its own lock, so symbols
//!    clear in parallel

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Execution, ClearingReport, price conversion
pub mod types;

/// Order book: price levels with FIFO chains over a slab
pub mod orderbook;

/// Clearing-price algorithms
pub mod matching;

/// Exchange: order entry and clearing cycles
pub mod engine;

/// Layered configuration
pub mod config;

/// Error types
pub mod error;

/// Monotonic id generators
pub mod sequence;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{ClearingReport, Execution, ExecutionType, Order, Side};
pub use orderbook::{LevelSummary, OrderBook};
pub use matching::{MatchingAlgorithm, MatchingResult, VolumeMaximization};
pub use engine::Exchange;
pub use error::{BookError, ConfigError, ExchangeError};
