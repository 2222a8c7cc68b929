//! Multi-symbol exchange: order validation, routing and clearing cycles.
//!
//! ## Locking
//!
//! Each symbol's book sits behind its own `RwLock`. Mutations (`send_order`,
//! `cancel_order`, `execute_match`, `run_clearing_cycle`) take the write
//! lock; queries and algorithm scans take the read lock. Books of different
//! symbols never share a lock.
//!
//! The order registry is a `DashMap` keyed by order id. A registry shard
//! guard and a book lock are never held together.

use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::ExchangeConfig;
use crate::error::{ConfigError, ExchangeError};
use crate::matching::{MatchingAlgorithm, MatchingResult};
use crate::orderbook::{LevelSummary, OrderBook};
use crate::sequence::SequenceGenerator;
use crate::types::price::PriceConverter;
use crate::types::{ClearingReport, Execution, Order, OrderId, Quantity, Side, Tick};

type SharedBook = Arc<RwLock<OrderBook>>;

/// Registry of per-symbol books and live orders.
///
/// ## Example
///
/// ```
/// use std::str::FromStr;
/// use rust_decimal::Decimal;
/// use call_auction::engine::Exchange;
/// use call_auction::matching::VolumeMaximization;
/// use call_auction::types::{Order, Side};
///
/// let exchange = Exchange::with_precision(4).unwrap();
/// let price = Decimal::from_str("100").unwrap();
///
/// exchange.send_order(Order::new(1, "XYZ", Side::Buy, 1_000, price)).unwrap();
/// exchange.send_order(Order::new(2, "XYZ", Side::Sell, 1_000, price)).unwrap();
///
/// let report = exchange.run_clearing_cycle(&VolumeMaximization, "XYZ").unwrap();
/// assert_eq!(report.result.volume, 1_000);
/// assert_eq!(report.executions.len(), 2);
/// ```
#[derive(Debug)]
pub struct Exchange {
    books: DashMap<String, SharedBook>,
    orders: DashMap<OrderId, Order>,
    converter: PriceConverter,
    execution_ids: SequenceGenerator,
    cycle_ids: SequenceGenerator,
    book_capacity: usize,
}

impl Exchange {
    pub fn new(config: ExchangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let converter = PriceConverter::new(config.price_precision)?;

        Ok(Self {
            books: DashMap::with_capacity(config.initial_symbol_capacity),
            orders: DashMap::with_capacity(config.initial_order_capacity),
            converter,
            execution_ids: SequenceGenerator::new(config.first_execution_id),
            cycle_ids: SequenceGenerator::new(1),
            book_capacity: config.initial_book_capacity,
        })
    }

    /// Exchange with default capacities at the given price precision
    pub fn with_precision(price_precision: u32) -> Result<Self, ConfigError> {
        Self::new(ExchangeConfig {
            price_precision,
            ..ExchangeConfig::default()
        })
    }

    // ========================================================================
    // Order Entry
    // ========================================================================

    /// Validate an order and queue it on its symbol's book.
    ///
    /// The book is created on the symbol's first order. On any rejection
    /// neither the registry nor a book is changed.
    pub fn send_order(&self, order: Order) -> Result<(), ExchangeError> {
        let order_id = order.id;
        self.accept(order)
            .inspect_err(|err| warn!(order_id, %err, "order rejected"))
    }

    fn accept(&self, mut order: Order) -> Result<(), ExchangeError> {
        if order.quantity == 0 {
            return Err(ExchangeError::InvalidQuantity(order.id));
        }
        if order.price <= rust_decimal::Decimal::ZERO {
            return Err(ExchangeError::InvalidPrice(order.id));
        }
        let tick = match self.converter.to_tick(order.price) {
            Some(0) => return Err(ExchangeError::PriceBelowTick(order.id)),
            Some(tick) => tick,
            None => return Err(ExchangeError::InvalidPrice(order.id)),
        };

        let (order_id, side, quantity) = (order.id, order.side, order.quantity);
        let symbol = order.symbol.clone();

        // Reserve the id before touching the book
        match self.orders.entry(order_id) {
            Entry::Occupied(_) => return Err(ExchangeError::DuplicateOrderId(order_id)),
            Entry::Vacant(slot) => {
                order.stamp_accepted(Utc::now());
                slot.insert(order);
            }
        }

        let book = self.book_or_create(&symbol);
        let added = book.write().add(order_id, side, quantity, tick);
        if let Err(err) = added {
            self.orders.remove(&order_id);
            return Err(err.into());
        }

        debug!(order_id, symbol = %symbol, ?side, quantity, tick, "order accepted");
        Ok(())
    }

    /// Remove a resting order.
    ///
    /// The order's own symbol, side and price locate it on the book; they
    /// must match how it was submitted.
    pub fn cancel_order(&self, order: &Order) -> Result<(), ExchangeError> {
        self.withdraw(order)
            .inspect_err(|err| warn!(order_id = order.id, %err, "cancel rejected"))
    }

    fn withdraw(&self, order: &Order) -> Result<(), ExchangeError> {
        if !self.orders.contains_key(&order.id) {
            return Err(ExchangeError::UnknownOrder(order.id));
        }
        let book = self
            .book(&order.symbol)
            .ok_or_else(|| ExchangeError::UnknownSymbol(order.symbol.clone()))?;

        // An unconvertible price can never name a live level
        let tick = self.converter.to_tick(order.price).unwrap_or(0);
        book.write().cancel(order.id, order.side, tick)?;
        self.orders.remove(&order.id);

        debug!(order_id = order.id, symbol = %order.symbol, tick, "order cancelled");
        Ok(())
    }

    // ========================================================================
    // Clearing
    // ========================================================================

    /// Run `algo` against a symbol's book without changing it.
    ///
    /// A symbol with no book is unmatched.
    pub fn run_matching_algo<A>(&self, algo: &A, symbol: &str) -> MatchingResult
    where
        A: MatchingAlgorithm + ?Sized,
    {
        let Some(book) = self.book(symbol) else {
            return MatchingResult::unmatched();
        };
        let result = algo.execute(&book.read());

        info!(symbol, algo = algo.name(), %result, "matching algorithm run");
        result
    }

    /// Fill resting orders at `tick` up to `volume` per side.
    ///
    /// Orders left with nothing available leave the registry. A symbol with
    /// no book yields no executions.
    pub fn execute_match(&self, symbol: &str, tick: Tick, volume: Quantity) -> Vec<Execution> {
        let Some(book) = self.book(symbol) else {
            return Vec::new();
        };
        let executions = book.write().execute(tick, volume, &self.execution_ids);
        self.retire_filled(&executions);

        info!(symbol, tick, volume, executions = executions.len(), "match executed");
        executions
    }

    /// Price discovery and execution under a single write lock.
    ///
    /// Returns `None` if the symbol has no book. An unmatched book still
    /// produces a report, with no executions.
    pub fn run_clearing_cycle<A>(&self, algo: &A, symbol: &str) -> Option<ClearingReport>
    where
        A: MatchingAlgorithm + ?Sized,
    {
        let book = self.book(symbol)?;

        let (result, executions, state_root) = {
            let mut book = book.write();
            let result = algo.execute(&book);
            let executions = if result.matched {
                book.execute(result.price, result.volume, &self.execution_ids)
            } else {
                Vec::new()
            };
            (result, executions, book.compute_state_root())
        };
        self.retire_filled(&executions);

        let report = ClearingReport {
            cycle_id: self.cycle_ids.next_id(),
            symbol: symbol.to_string(),
            result,
            executions,
            state_root,
            completed_at: Utc::now(),
        };

        info!(
            cycle_id = report.cycle_id,
            symbol,
            algo = algo.name(),
            matched = result.matched,
            price = %self.converter.to_decimal(result.price),
            volume = result.volume,
            executions = report.executions.len(),
            state_root = %report.state_root_hex(),
            "clearing cycle complete"
        );
        Some(report)
    }

    fn retire_filled(&self, executions: &[Execution]) {
        for execution in executions.iter().filter(|e| e.is_full()) {
            self.orders.remove(&execution.order_id);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Available quantity at a tick; 0 for an unknown symbol.
    pub fn available_quantity_at(&self, symbol: &str, tick: Tick, side: Side) -> Quantity {
        self.book(symbol)
            .map_or(0, |book| book.read().available_quantity_at(tick, side))
    }

    /// Live ticks of one side, most aggressive first.
    pub fn ticks(&self, symbol: &str, side: Side) -> Vec<Tick> {
        self.book(symbol)
            .map(|book| book.read().ticks(side))
            .unwrap_or_default()
    }

    /// Depth snapshot of one side, most aggressive first.
    pub fn depth(&self, symbol: &str, side: Side) -> Vec<LevelSummary> {
        self.book(symbol)
            .map(|book| book.read().levels(side))
            .unwrap_or_default()
    }

    /// A live order as accepted, with its acceptance time
    pub fn order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.get(&order_id).map(|o| o.value().clone())
    }

    /// Number of live orders across all symbols
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Symbols with a book, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.books.iter().map(|e| e.key().clone()).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn book_state_root(&self, symbol: &str) -> Option<[u8; 32]> {
        self.book(symbol).map(|book| book.read().compute_state_root())
    }

    #[inline]
    pub fn converter(&self) -> &PriceConverter {
        &self.converter
    }

    fn book(&self, symbol: &str) -> Option<SharedBook> {
        self.books.get(symbol).map(|b| Arc::clone(b.value()))
    }

    fn book_or_create(&self, symbol: &str) -> SharedBook {
        if let Some(book) = self.book(symbol) {
            return book;
        }
        let capacity = self.book_capacity;
        let book = self
            .books
            .entry(symbol.to_string())
            .or_insert_with(|| {
                debug!(symbol, "order book created");
                Arc::new(RwLock::new(OrderBook::with_capacity(capacity)))
            });
        Arc::clone(book.value())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookError;
    use crate::matching::VolumeMaximization;
    use crate::types::ExecutionType;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SYM: &str = "0005.HK";

    fn px(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn exchange() -> Exchange {
        Exchange::with_precision(4).unwrap()
    }

    fn order(id: OrderId, side: Side, quantity: Quantity, price: &str) -> Order {
        Order::new(id, SYM, side, quantity, px(price))
    }

    #[test]
    fn test_send_order_creates_book() {
        let ex = exchange();
        assert!(ex.symbols().is_empty());

        ex.send_order(order(1, Side::Buy, 2_000, "100")).unwrap();

        assert_eq!(ex.symbols(), vec![SYM.to_string()]);
        assert_eq!(ex.available_quantity_at(SYM, 1_000_000, Side::Buy), 2_000);
        assert!(ex.order(1).unwrap().accepted_at().is_some());
    }

    #[test]
    fn test_send_order_truncates_price() {
        let ex = exchange();
        ex.send_order(order(1, Side::Buy, 100, "100.00049")).unwrap();
        ex.send_order(order(2, Side::Buy, 100, "100.0004")).unwrap();

        assert_eq!(ex.ticks(SYM, Side::Buy), vec![1_000_004]);
        assert_eq!(ex.available_quantity_at(SYM, 1_000_004, Side::Buy), 200);
    }

    #[test]
    fn test_validation_rejects_without_state() {
        let ex = exchange();

        assert_eq!(
            ex.send_order(order(1, Side::Buy, 0, "100")),
            Err(ExchangeError::InvalidQuantity(1))
        );
        assert_eq!(
            ex.send_order(order(2, Side::Buy, 10, "0")),
            Err(ExchangeError::InvalidPrice(2))
        );
        assert_eq!(
            ex.send_order(order(3, Side::Sell, 10, "-5")),
            Err(ExchangeError::InvalidPrice(3))
        );
        assert_eq!(
            ex.send_order(order(4, Side::Sell, 10, "0.00001")),
            Err(ExchangeError::PriceBelowTick(4))
        );

        assert_eq!(ex.order_count(), 0);
        assert!(ex.symbols().is_empty());
    }

    #[test]
    fn test_duplicate_order_id_rejected() {
        let ex = exchange();
        ex.send_order(order(1, Side::Buy, 2_000, "100")).unwrap();
        let first = ex.order(1).unwrap();

        // Same id, even on another symbol
        let other = Order::new(1, "OTHER", Side::Sell, 10, px("99"));
        assert_eq!(ex.send_order(other), Err(ExchangeError::DuplicateOrderId(1)));
        assert_eq!(
            ex.send_order(order(1, Side::Buy, 2_000, "100")),
            Err(ExchangeError::DuplicateOrderId(1))
        );

        assert_eq!(ex.order(1).unwrap(), first);
        assert_eq!(ex.available_quantity_at(SYM, 1_000_000, Side::Buy), 2_000);
        assert_eq!(ex.symbols(), vec![SYM.to_string()]);
    }

    #[test]
    fn test_level_overflow_rolls_back_registry() {
        let ex = exchange();
        let half = Quantity::MAX / 2 + 1;
        ex.send_order(order(1, Side::Buy, half, "100")).unwrap();
        let root = ex.book_state_root(SYM);

        assert_eq!(
            ex.send_order(order(2, Side::Buy, half, "100")),
            Err(ExchangeError::Book(BookError::QuantityOverflow {
                side: Side::Buy,
                tick: 1_000_000,
                quantity: half,
            }))
        );

        assert!(ex.order(2).is_none());
        assert_eq!(ex.order_count(), 1);
        assert_eq!(ex.book_state_root(SYM), root);
        assert_eq!(ex.available_quantity_at(SYM, 1_000_000, Side::Buy), half);
    }

    #[test]
    fn test_clearing_with_side_total_past_quantity_range() {
        let ex = exchange();
        let half = Quantity::MAX / 2 + 1;
        ex.send_order(order(1, Side::Buy, half, "101")).unwrap();
        ex.send_order(order(2, Side::Buy, half, "100")).unwrap();
        ex.send_order(order(3, Side::Sell, 1_000, "100")).unwrap();

        let report = ex.run_clearing_cycle(&VolumeMaximization, SYM).unwrap();

        assert_eq!(report.result, MatchingResult::matched(1_010_000, 1_000));
        assert_eq!(report.filled_quantity(Side::Buy), 1_000);
        assert_eq!(ex.available_quantity_at(SYM, 1_010_000, Side::Buy), half - 1_000);
        assert!(ex.order(3).is_none());
    }

    #[test]
    fn test_cancel_round_trip() {
        let ex = exchange();
        let o = order(1, Side::Sell, 500, "101");
        ex.send_order(o.clone()).unwrap();

        ex.cancel_order(&o).unwrap();

        assert!(ex.order(1).is_none());
        assert!(ex.ticks(SYM, Side::Sell).is_empty());
        assert_eq!(ex.cancel_order(&o), Err(ExchangeError::UnknownOrder(1)));
    }

    #[test]
    fn test_cancel_with_wrong_price_rejected() {
        let ex = exchange();
        ex.send_order(order(1, Side::Buy, 500, "100")).unwrap();
        ex.send_order(order(2, Side::Buy, 500, "99")).unwrap();

        let moved = order(1, Side::Buy, 500, "99");
        assert_eq!(
            ex.cancel_order(&moved),
            Err(ExchangeError::Book(BookError::OrderNotAtLevel {
                order_id: 1,
                side: Side::Buy,
                tick: 990_000
            }))
        );
        let missing = order(1, Side::Buy, 500, "98");
        assert_eq!(
            ex.cancel_order(&missing),
            Err(ExchangeError::Book(BookError::LevelNotFound {
                side: Side::Buy,
                tick: 980_000
            }))
        );

        assert!(ex.order(1).is_some());
        assert_eq!(ex.available_quantity_at(SYM, 1_000_000, Side::Buy), 500);
    }

    #[test]
    fn test_cancel_unknown_symbol() {
        let ex = exchange();
        ex.send_order(order(1, Side::Buy, 500, "100")).unwrap();

        let elsewhere = Order::new(1, "NOPE", Side::Buy, 500, px("100"));
        assert_eq!(
            ex.cancel_order(&elsewhere),
            Err(ExchangeError::UnknownSymbol("NOPE".to_string()))
        );
    }

    #[test]
    fn test_unknown_symbol_queries_are_empty() {
        let ex = exchange();

        assert_eq!(
            ex.run_matching_algo(&VolumeMaximization, "NOPE"),
            MatchingResult::unmatched()
        );
        assert!(ex.execute_match("NOPE", 1_000_000, 100).is_empty());
        assert!(ex.run_clearing_cycle(&VolumeMaximization, "NOPE").is_none());
        assert_eq!(ex.available_quantity_at("NOPE", 1_000_000, Side::Buy), 0);
        assert!(ex.ticks("NOPE", Side::Sell).is_empty());
        assert!(ex.depth("NOPE", Side::Sell).is_empty());
        assert!(ex.book_state_root("NOPE").is_none());
    }

    #[test]
    fn test_match_then_execute() {
        let ex = exchange();
        ex.send_order(order(1, Side::Buy, 2_000, "100")).unwrap();
        ex.send_order(order(2, Side::Sell, 1_000, "100")).unwrap();

        let result = ex.run_matching_algo(&VolumeMaximization, SYM);
        assert_eq!(result, MatchingResult::matched(1_000_000, 1_000));

        let execs = ex.execute_match(SYM, result.price, result.volume);
        assert_eq!(execs.len(), 2);
        assert_eq!(execs[0].execution_type(), ExecutionType::Partial);
        assert!(execs[1].is_full());

        // Partial stays registered, full leaves
        assert!(ex.order(1).is_some());
        assert!(ex.order(2).is_none());
        assert_eq!(ex.available_quantity_at(SYM, 1_000_000, Side::Buy), 1_000);
    }

    #[test]
    fn test_filled_order_id_can_be_reused() {
        let ex = exchange();
        ex.send_order(order(1, Side::Buy, 1_000, "100")).unwrap();
        ex.send_order(order(2, Side::Sell, 1_000, "100")).unwrap();
        ex.run_clearing_cycle(&VolumeMaximization, SYM).unwrap();

        assert_eq!(ex.order_count(), 0);
        assert!(ex.send_order(order(1, Side::Sell, 10, "101")).is_ok());
    }

    #[test]
    fn test_clearing_cycle_report() {
        let ex = exchange();
        for (id, price) in [(1, "102"), (2, "101"), (3, "100"), (4, "99")] {
            ex.send_order(order(id, Side::Buy, 1_000, price)).unwrap();
        }
        ex.send_order(order(5, Side::Sell, 2_000, "100")).unwrap();

        let report = ex.run_clearing_cycle(&VolumeMaximization, SYM).unwrap();

        assert_eq!(report.cycle_id, 1);
        assert_eq!(report.result, MatchingResult::matched(1_010_000, 2_000));
        assert_eq!(report.filled_quantity(Side::Buy), 2_000);
        assert_eq!(report.filled_quantity(Side::Sell), 2_000);
        assert!(report.executions.iter().all(|e| e.price == 1_010_000));
        assert_eq!(Some(report.state_root), ex.book_state_root(SYM));
        assert_eq!(ex.ticks(SYM, Side::Buy), vec![1_000_000, 990_000]);

        // Nothing crosses any more
        let again = ex.run_clearing_cycle(&VolumeMaximization, SYM).unwrap();
        assert_eq!(again.cycle_id, 2);
        assert!(!again.result.matched);
        assert!(again.is_empty());
        assert_eq!(again.state_root, report.state_root);
    }

    #[test]
    fn test_execution_ids_are_venue_wide() {
        let ex = Exchange::new(ExchangeConfig {
            first_execution_id: 1_000,
            ..ExchangeConfig::default()
        })
        .unwrap();
        for (id, sym) in [(1, "A"), (3, "B")] {
            ex.send_order(Order::new(id, sym, Side::Buy, 10, px("5"))).unwrap();
            ex.send_order(Order::new(id + 1, sym, Side::Sell, 10, px("5"))).unwrap();
        }

        let a = ex.run_clearing_cycle(&VolumeMaximization, "A").unwrap();
        let b = ex.run_clearing_cycle(&VolumeMaximization, "B").unwrap();

        let ids: Vec<u64> = a
            .executions
            .iter()
            .chain(b.executions.iter())
            .map(|e| e.execution_id)
            .collect();
        assert_eq!(ids, vec![1_000, 1_001, 1_002, 1_003]);
    }

    #[test]
    fn test_invalid_precision() {
        assert!(matches!(
            Exchange::with_precision(13),
            Err(ConfigError::PrecisionOutOfRange { precision: 13, .. })
        ));
    }

    #[test]
    fn test_concurrent_symbols() {
        let ex = exchange();
        let symbols = ["A", "B", "C", "D"];

        let reports: Vec<ClearingReport> = std::thread::scope(|s| {
            let handles: Vec<_> = symbols
                .iter()
                .enumerate()
                .map(|(n, &sym)| {
                    let ex = &ex;
                    s.spawn(move || {
                        let base = (n as u64) * 1_000;
                        // 20 orders of 10 per side at each of 100..=104
                        for i in 0..100u64 {
                            let price = px(&(100 + i % 5).to_string());
                            ex.send_order(Order::new(base + 2 * i, sym, Side::Buy, 10, price))
                                .unwrap();
                            ex.send_order(Order::new(base + 2 * i + 1, sym, Side::Sell, 10, price))
                                .unwrap();
                        }
                        ex.run_clearing_cycle(&VolumeMaximization, sym).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(ex.symbols(), vec!["A", "B", "C", "D"]);
        for report in &reports {
            assert_eq!(report.result, MatchingResult::matched(1_020_000, 600));
            assert_eq!(report.executions.len(), 120);
            assert_eq!(ex.ticks(&report.symbol, Side::Buy), vec![1_010_000, 1_000_000]);
            assert_eq!(ex.ticks(&report.symbol, Side::Sell), vec![1_030_000, 1_040_000]);
        }
        assert_eq!(ex.order_count(), 4 * 80);

        let mut ids: Vec<u64> = reports
            .iter()
            .flat_map(|r| r.executions.iter().map(|e| e.execution_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4 * 120);
    }
}
