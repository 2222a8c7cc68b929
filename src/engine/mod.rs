//! Exchange engine: the single authorised mutator of every order book.
//!
//! ## Flow
//!
//! 1. `send_order` validates the order, converts its price to a tick and
//!    queues it on the symbol's book (created on first use)
//! 2. `run_matching_algo` asks a [`MatchingAlgorithm`] for a clearing price
//! 3. `execute_match` fills resting orders at that price
//!
//! `run_clearing_cycle` performs steps 2 and 3 under one book lock, so no
//! order can arrive or leave between pricing and execution.
//!
//! ## Example
//!
//! ```
//! use std::str::FromStr;
//! use rust_decimal::Decimal;
//! use call_auction::engine::Exchange;
//! use call_auction::matching::VolumeMaximization;
//! use call_auction::types::{Order, Side};
//!
//! let exchange = Exchange::with_precision(4).unwrap();
//! let bid = Order::new(1, "XYZ", Side::Buy, 2_000, Decimal::from_str("100").unwrap());
//! let ask = Order::new(2, "XYZ", Side::Sell, 1_000, Decimal::from_str("100").unwrap());
//! exchange.send_order(bid).unwrap();
//! exchange.send_order(ask).unwrap();
//!
//! let result = exchange.run_matching_algo(&VolumeMaximization, "XYZ");
//! assert!(result.matched);
//!
//! let executions = exchange.execute_match("XYZ", result.price, result.volume);
//! assert_eq!(executions.len(), 2);
//! assert_eq!(exchange.available_quantity_at("XYZ", 1_000_000, Side::Buy), 1_000);
//! ```
//!
//! [`MatchingAlgorithm`]: crate::matching::MatchingAlgorithm

pub mod exchange;

pub use exchange::Exchange;
