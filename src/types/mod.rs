//! Core data types for the call auction.
//!
//! ## Types
//!
//! - [`Order`]: A limit order submitted to the exchange
//! - [`Side`]: Buy or Sell
//! - [`Execution`]: A single fill against one resting order
//! - [`ClearingReport`]: Summary of one clearing cycle
//!
//! ## Fixed-Point Prices
//!
//! Order prices arrive as [`rust_decimal::Decimal`] and are converted once,
//! on acceptance, into integer ticks at the venue precision (see [`price`]).
//! Books, the clearing algorithm and executions only ever see ticks.

mod order;
mod execution;
mod report;
pub mod price;

pub use order::{Order, Side};
pub use execution::{Execution, ExecutionType};
pub use report::ClearingReport;

/// Caller-assigned order identifier.
pub type OrderId = u64;

/// Integer fixed-point price at the venue precision.
pub type Tick = u64;

/// Order and fill quantities.
pub type Quantity = u64;
