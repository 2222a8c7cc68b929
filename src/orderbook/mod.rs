//! Per-symbol limit order book.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: O(1) entry insertion, removal and lookup
//! - **Price levels**: entries grouped by tick in a `BTreeMap` per side
//! - **Price-time priority**: FIFO chain at each price level
//!
//! ## Components
//!
//! - [`OrderEntry`]: live fill state of one order plus its chain pointers
//! - [`PriceLevel`]: FIFO chain of entries at a single tick
//! - [`BookSide`]: the price levels of one side, ordered by [`LevelKey`]
//! - [`OrderBook`]: both sides plus the order id index
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order | O(log L) |
//! | Cancel order by id | O(log L) |
//! | Available quantity at tick | O(log L) |
//! | Execute at clearing tick | O(k log L) |
//!
//! L is the number of live levels on the side; k the number of fills.

pub mod node;
pub mod level;
pub mod side;
pub mod book;
mod execution;

pub use node::OrderEntry;
pub use level::PriceLevel;
pub use side::{AskSide, BidSide, BookSide, LevelKey, LevelSummary};
pub use book::OrderBook;
