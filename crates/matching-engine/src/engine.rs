//! Matching engine registry
//!
//! Owns the symbol → book directory and the cross-book order-id index, and
//! drives the matcher. Each book has its own reader-writer lock so symbols
//! match in parallel; a matching operation holds the book's exclusive lock
//! for the whole loop including remainder insertion.
//!
//! Lock discipline: registry map guards are always dropped before a book
//! lock is acquired (book `Arc`s are stable once created), and no lock is
//! held across an await point anywhere in this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::book::OrderBook;
use crate::domain::{BookSnapshot, Order, OrderKind, OrderStatus, Side, Trade};
use crate::error::EngineError;
use crate::matcher;
use crate::metrics::EngineMetrics;
use crate::result::OrderResult;

type SharedBook = Arc<RwLock<OrderBook>>;

const DEFAULT_TRADE_HISTORY: usize = 1000;

/// The matching engine
///
/// CRITICAL PROPERTIES:
/// 1. Deterministic: identical submission sequences produce identical trades
/// 2. Serializable per symbol: submissions on one book are totally ordered
/// 3. Per-symbol isolation: books never interact
pub struct MatchingEngine {
    /// Order books per symbol
    books: RwLock<HashMap<String, SharedBook>>,
    /// Order id → owning book, kept for O(1) cancel and status lookup
    order_index: RwLock<HashMap<Uuid, SharedBook>>,
    /// Recent trades per symbol, capped at `max_trades_per_symbol`
    trades: RwLock<HashMap<String, VecDeque<Trade>>>,
    metrics: Arc<EngineMetrics>,
    max_trades_per_symbol: usize,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::with_trade_history(DEFAULT_TRADE_HISTORY)
    }

    /// Create an engine keeping at most `max_trades` recent trades per symbol
    pub fn with_trade_history(max_trades: usize) -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            order_index: RwLock::new(HashMap::new()),
            trades: RwLock::new(HashMap::new()),
            metrics: Arc::new(EngineMetrics::new()),
            max_trades_per_symbol: max_trades,
        }
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Submit an order and match it against its symbol's book
    ///
    /// This is the main entry point. Validation failures and the market
    /// liquidity precheck reject before any book mutation.
    pub fn submit_order(
        &self,
        symbol: &str,
        side: Side,
        kind: OrderKind,
        price: i64,
        quantity: i64,
    ) -> Result<OrderResult, EngineError> {
        let start = Instant::now();
        self.metrics.orders_received.increment();

        if quantity <= 0 {
            self.metrics.orders_rejected.increment();
            return Err(EngineError::InvalidQuantity(quantity));
        }
        if kind == OrderKind::Limit && price <= 0 {
            self.metrics.orders_rejected.increment();
            return Err(EngineError::InvalidPrice(price));
        }

        // The limit price is meaningless for market orders; store zero
        let price = if kind.is_market() { 0 } else { price };
        let mut order = Order::new(symbol, side, kind, price, quantity);

        let shared = self.get_or_create_book(symbol);
        let (result, trades) = {
            let mut book = shared.write();
            order.sequence = book.next_sequence();

            let trades = match matcher::execute(&mut book, &mut order) {
                Ok(trades) => trades,
                Err(err) => {
                    self.metrics.orders_rejected.increment();
                    warn!(symbol, side = %side, quantity, %err, "order rejected");
                    return Err(err);
                }
            };

            if order.is_filled() {
                order.status = OrderStatus::Filled;
            } else {
                // The precheck guarantees market orders fill completely
                debug_assert_eq!(order.kind, OrderKind::Limit);
                order.status = if order.filled > 0 {
                    OrderStatus::PartialFill
                } else {
                    OrderStatus::Accepted
                };
                book.insert(&order);
            }

            let result = OrderResult::from_order(&order, trades.clone());
            book.register(order.clone());
            self.metrics.book_depth.set(book.open_order_count() as u64);
            (result, trades)
        };

        self.order_index
            .write()
            .insert(order.id, Arc::clone(&shared));

        if !trades.is_empty() {
            self.metrics.orders_matched.increment();
            self.metrics.trades_executed.add(trades.len() as u64);
            self.record_trades(symbol, &trades);
        }
        self.metrics.record_match_latency(start.elapsed());

        info!(
            order_id = %order.id,
            symbol,
            side = %side,
            kind = %kind,
            status = %result.status,
            trades = trades.len(),
            "order processed"
        );

        Ok(result)
    }

    /// Cancel a resting order anywhere in the engine
    ///
    /// If a concurrent match is consuming the order, the book lock
    /// serializes the race: whichever operation wins the write lock decides
    /// whether the cancel sees an open or a FILLED order.
    pub fn cancel_order(&self, order_id: Uuid) -> Result<Order, EngineError> {
        let shared = self
            .lookup_order_book(order_id)
            .ok_or(EngineError::NotFound(order_id))?;

        let cancelled = {
            let mut book = shared.write();
            let cancelled = book.remove(order_id)?;
            self.metrics.book_depth.set(book.open_order_count() as u64);
            cancelled
        };

        self.metrics.orders_cancelled.increment();
        info!(order_id = %order_id, symbol = %cancelled.symbol, "order cancelled");
        Ok(cancelled)
    }

    /// Look up any order ever submitted, including terminal ones
    pub fn get_order(&self, order_id: Uuid) -> Result<Order, EngineError> {
        let shared = self
            .lookup_order_book(order_id)
            .ok_or(EngineError::NotFound(order_id))?;
        let book = shared.read();
        Ok(book
            .order(order_id)
            .expect("indexed order missing from its book")
            .clone())
    }

    /// Top-of-book snapshot for a symbol
    ///
    /// Unknown symbols yield an empty snapshot without registering a book;
    /// read paths never create state.
    pub fn order_book_snapshot(&self, symbol: &str, depth: usize) -> BookSnapshot {
        match self.lookup_book(symbol) {
            Some(shared) => shared.read().depth(depth),
            None => BookSnapshot::empty(symbol),
        }
    }

    /// Most recent trades for a symbol, oldest first
    pub fn recent_trades(&self, symbol: &str, limit: usize) -> Vec<Trade> {
        let trades = self.trades.read();
        match trades.get(symbol) {
            Some(history) => {
                let skip = history.len().saturating_sub(limit);
                history.iter().skip(skip).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// Symbols with a book, in no particular order
    pub fn symbols(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }

    fn get_or_create_book(&self, symbol: &str) -> SharedBook {
        if let Some(book) = self.books.read().get(symbol) {
            return Arc::clone(book);
        }
        let mut books = self.books.write();
        Arc::clone(
            books
                .entry(symbol.to_string())
                .or_insert_with(|| Arc::new(RwLock::new(OrderBook::new(symbol)))),
        )
    }

    fn lookup_book(&self, symbol: &str) -> Option<SharedBook> {
        self.books.read().get(symbol).map(Arc::clone)
    }

    fn lookup_order_book(&self, order_id: Uuid) -> Option<SharedBook> {
        self.order_index.read().get(&order_id).map(Arc::clone)
    }

    fn record_trades(&self, symbol: &str, trades: &[Trade]) {
        let mut map = self.trades.write();
        let history = map.entry(symbol.to_string()).or_default();
        for trade in trades {
            history.push_back(trade.clone());
        }
        while history.len() > self.max_trades_per_symbol {
            history.pop_front();
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(
        engine: &MatchingEngine,
        symbol: &str,
        side: Side,
        price: i64,
        quantity: i64,
    ) -> OrderResult {
        engine
            .submit_order(symbol, side, OrderKind::Limit, price, quantity)
            .unwrap()
    }

    fn market(
        engine: &MatchingEngine,
        symbol: &str,
        side: Side,
        quantity: i64,
    ) -> Result<OrderResult, EngineError> {
        engine.submit_order(symbol, side, OrderKind::Market, 0, quantity)
    }

    /// Total remaining quantity across both sides of one book
    fn resting_quantity(engine: &MatchingEngine, symbol: &str) -> i64 {
        let snapshot = engine.order_book_snapshot(symbol, usize::MAX);
        snapshot
            .bids
            .iter()
            .chain(snapshot.asks.iter())
            .map(|level| level.quantity)
            .sum()
    }

    #[test]
    fn test_resting_order_accepted() {
        let engine = MatchingEngine::new();
        let result = limit(&engine, "AAPL", Side::Buy, 15000, 100);

        assert_eq!(result.status, OrderStatus::Accepted);
        assert_eq!(result.filled_quantity, 0);
        assert_eq!(result.remaining_quantity, 100);
        assert!(!result.has_trades());
        assert_eq!(result.message.as_deref(), Some("Order added to book"));
    }

    #[test]
    fn test_simple_match() {
        let engine = MatchingEngine::new();
        let sell = limit(&engine, "AAPL", Side::Sell, 15050, 100);
        assert_eq!(sell.status, OrderStatus::Accepted);

        let buy = limit(&engine, "AAPL", Side::Buy, 15050, 100);
        assert_eq!(buy.status, OrderStatus::Filled);
        assert_eq!(buy.trades.len(), 1);
        assert_eq!(buy.trades[0].price, 15050);
        assert_eq!(buy.trades[0].quantity, 100);
        assert_eq!(buy.trades[0].buyer_order_id, buy.order_id);
        assert_eq!(buy.trades[0].seller_order_id, sell.order_id);

        // Both sides consumed; nothing rests
        let snapshot = engine.order_book_snapshot("AAPL", 10);
        assert!(snapshot.bids.is_empty());
        assert!(snapshot.asks.is_empty());
    }

    #[test]
    fn test_partial_fill_rests_remainder() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Sell, 15050, 50);

        let buy = limit(&engine, "AAPL", Side::Buy, 15050, 100);
        assert_eq!(buy.status, OrderStatus::PartialFill);
        assert_eq!(buy.filled_quantity, 50);
        assert_eq!(buy.remaining_quantity, 50);
        assert_eq!(buy.trades.len(), 1);

        let snapshot = engine.order_book_snapshot("AAPL", 10);
        assert!(snapshot.asks.is_empty());
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.bids[0].price, 15050);
        assert_eq!(snapshot.bids[0].quantity, 50);
    }

    #[test]
    fn test_no_cross() {
        let engine = MatchingEngine::new();
        let sell = limit(&engine, "AAPL", Side::Sell, 15100, 100);
        let buy = limit(&engine, "AAPL", Side::Buy, 15000, 100);

        assert_eq!(sell.status, OrderStatus::Accepted);
        assert_eq!(buy.status, OrderStatus::Accepted);
        assert!(!sell.has_trades() && !buy.has_trades());

        let snapshot = engine.order_book_snapshot("AAPL", 10);
        assert_eq!(snapshot.bids[0].price, 15000);
        assert_eq!(snapshot.asks[0].price, 15100);
    }

    #[test]
    fn test_market_walks_the_book() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Sell, 20000, 100);
        limit(&engine, "AAPL", Side::Sell, 20050, 200);

        let result = market(&engine, "AAPL", Side::Buy, 150).unwrap();
        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(result.trades.len(), 2);
        assert_eq!((result.trades[0].price, result.trades[0].quantity), (20000, 100));
        assert_eq!((result.trades[1].price, result.trades[1].quantity), (20050, 50));

        let snapshot = engine.order_book_snapshot("AAPL", 10);
        assert_eq!(snapshot.asks.len(), 1);
        assert_eq!(snapshot.asks[0].price, 20050);
        assert_eq!(snapshot.asks[0].quantity, 150);
    }

    #[test]
    fn test_market_insufficient_liquidity() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Sell, 14000, 50);

        let err = market(&engine, "AAPL", Side::Buy, 100).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientLiquidity {
                available: 50,
                requested: 100
            }
        );

        // The resting sell is untouched
        let snapshot = engine.order_book_snapshot("AAPL", 10);
        assert_eq!(snapshot.asks[0].quantity, 50);
    }

    #[test]
    fn test_market_against_empty_book() {
        let engine = MatchingEngine::new();
        let err = market(&engine, "AAPL", Side::Sell, 10).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientLiquidity { available: 0, .. }
        ));
    }

    #[test]
    fn test_price_improvement() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Sell, 15000, 100);

        let buy = limit(&engine, "AAPL", Side::Buy, 15100, 100);
        assert_eq!(buy.status, OrderStatus::Filled);
        assert_eq!(buy.trades.len(), 1);
        // Executes at the resting price, not the aggressor's limit
        assert_eq!(buy.trades[0].price, 15000);
    }

    #[test]
    fn test_fifo_within_price_level() {
        let engine = MatchingEngine::new();
        let s1 = limit(&engine, "AAPL", Side::Sell, 15050, 100);
        let s2 = limit(&engine, "AAPL", Side::Sell, 15050, 100);
        let s3 = limit(&engine, "AAPL", Side::Sell, 15050, 100);

        let buy = limit(&engine, "AAPL", Side::Buy, 15050, 150);
        assert_eq!(buy.trades.len(), 2);
        assert_eq!(buy.trades[0].seller_order_id, s1.order_id);
        assert_eq!(buy.trades[0].quantity, 100);
        assert_eq!(buy.trades[1].seller_order_id, s2.order_id);
        assert_eq!(buy.trades[1].quantity, 50);

        let first = engine.get_order(s1.order_id).unwrap();
        assert_eq!(first.status, OrderStatus::Filled);

        let second = engine.get_order(s2.order_id).unwrap();
        assert_eq!(second.status, OrderStatus::PartialFill);
        assert_eq!(second.filled, 50);

        let third = engine.get_order(s3.order_id).unwrap();
        assert_eq!(third.status, OrderStatus::Accepted);
        assert_eq!(third.filled, 0);
    }

    #[test]
    fn test_cross_symbol_isolation() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Sell, 15050, 100);
        limit(&engine, "TSLA", Side::Sell, 20000, 10);
        limit(&engine, "GOOGL", Side::Buy, 13000, 25);

        // A crossing buy on AAPL touches nothing else
        let buy = limit(&engine, "AAPL", Side::Buy, 15050, 100);
        assert_eq!(buy.status, OrderStatus::Filled);

        let tsla = engine.order_book_snapshot("TSLA", 10);
        assert_eq!(tsla.asks[0].quantity, 10);
        assert!(tsla.bids.is_empty());

        let googl = engine.order_book_snapshot("GOOGL", 10);
        assert_eq!(googl.bids[0].quantity, 25);
        assert!(googl.asks.is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let engine = MatchingEngine::new();

        let err = engine
            .submit_order("AAPL", Side::Buy, OrderKind::Limit, 15000, 0)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidQuantity(0));

        let err = engine
            .submit_order("AAPL", Side::Buy, OrderKind::Limit, -1, 10)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidPrice(-1));

        // Market orders carry no price, so a zero price is fine but
        // liquidity is still required
        let err = engine
            .submit_order("AAPL", Side::Buy, OrderKind::Market, 0, -3)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidQuantity(-3));

        // Nothing was created
        assert!(engine.order_book_snapshot("AAPL", 10).bids.is_empty());
    }

    #[test]
    fn test_cancel_resting_order() {
        let engine = MatchingEngine::new();
        let result = limit(&engine, "AAPL", Side::Buy, 15000, 100);

        let cancelled = engine.cancel_order(result.order_id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Insert-then-cancel leaves the ladder empty
        let snapshot = engine.order_book_snapshot("AAPL", 10);
        assert!(snapshot.bids.is_empty());

        // Terminal state remains queryable
        let order = engine.get_order(result.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_cancel_filled_order() {
        let engine = MatchingEngine::new();
        let sell = limit(&engine, "AAPL", Side::Sell, 15050, 100);
        limit(&engine, "AAPL", Side::Buy, 15050, 100);

        let err = engine.cancel_order(sell.order_id).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotCancellable {
                id: sell.order_id,
                status: OrderStatus::Filled
            }
        );
    }

    #[test]
    fn test_cancel_twice() {
        let engine = MatchingEngine::new();
        let result = limit(&engine, "AAPL", Side::Buy, 15000, 100);

        engine.cancel_order(result.order_id).unwrap();
        let err = engine.cancel_order(result.order_id).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotCancellable {
                id: result.order_id,
                status: OrderStatus::Cancelled
            }
        );
    }

    #[test]
    fn test_cancel_unknown_order() {
        let engine = MatchingEngine::new();
        let err = engine.cancel_order(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_cancelled_order_never_matches() {
        let engine = MatchingEngine::new();
        let sell = limit(&engine, "AAPL", Side::Sell, 15050, 100);
        engine.cancel_order(sell.order_id).unwrap();

        let buy = limit(&engine, "AAPL", Side::Buy, 15050, 100);
        assert_eq!(buy.status, OrderStatus::Accepted);
        assert!(!buy.has_trades());
    }

    #[test]
    fn test_get_order_tracks_lifecycle() {
        let engine = MatchingEngine::new();
        let sell = limit(&engine, "AAPL", Side::Sell, 15050, 100);

        let order = engine.get_order(sell.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);

        limit(&engine, "AAPL", Side::Buy, 15050, 40);
        let order = engine.get_order(sell.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::PartialFill);
        assert_eq!(order.filled, 40);

        limit(&engine, "AAPL", Side::Buy, 15050, 60);
        let order = engine.get_order(sell.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.filled, 100);
    }

    #[test]
    fn test_snapshot_of_unknown_symbol_is_empty_and_creates_nothing() {
        let engine = MatchingEngine::new();
        let snapshot = engine.order_book_snapshot("UNKNOWN", 10);
        assert_eq!(snapshot.symbol, "UNKNOWN");
        assert!(snapshot.bids.is_empty() && snapshot.asks.is_empty());
        assert!(engine.symbols().is_empty());
    }

    #[test]
    fn test_book_is_never_crossed_at_rest() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Buy, 15000, 10);
        limit(&engine, "AAPL", Side::Sell, 15100, 10);
        limit(&engine, "AAPL", Side::Buy, 14900, 10);
        limit(&engine, "AAPL", Side::Sell, 15050, 10);
        // Crossing order consumes instead of resting alongside
        limit(&engine, "AAPL", Side::Sell, 14950, 15);

        let snapshot = engine.order_book_snapshot("AAPL", 10);
        let best_bid = snapshot.bids.first().map(|level| level.price);
        let best_ask = snapshot.asks.first().map(|level| level.price);
        if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
            assert!(bid < ask, "book crossed at rest: bid {bid} >= ask {ask}");
        }
    }

    #[test]
    fn test_conservation_across_submissions() {
        let engine = MatchingEngine::new();
        let mut submitted = 0;
        let mut traded = 0;

        let orders = [
            (Side::Sell, 15050, 100),
            (Side::Sell, 15100, 50),
            (Side::Buy, 15000, 80),
            (Side::Buy, 15060, 120),
            (Side::Sell, 15000, 200),
            (Side::Buy, 15080, 30),
        ];
        for (side, price, quantity) in orders {
            let result = limit(&engine, "AAPL", side, price, quantity);
            submitted += quantity;
            traded += result.trades.iter().map(|t| t.quantity).sum::<i64>();
        }

        // Each trade consumes the same quantity from both sides
        assert_eq!(resting_quantity(&engine, "AAPL"), submitted - 2 * traded);
    }

    #[test]
    fn test_determinism() {
        let orders = [
            (Side::Sell, 15100, 10),
            (Side::Sell, 15050, 5),
            (Side::Buy, 15100, 12),
            (Side::Sell, 15000, 4),
            (Side::Buy, 15000, 7),
        ];

        let run = || {
            let engine = MatchingEngine::new();
            let mut executions = Vec::new();
            let mut statuses = Vec::new();
            for (side, price, quantity) in orders {
                let result = limit(&engine, "AAPL", side, price, quantity);
                statuses.push(result.status);
                for trade in &result.trades {
                    executions.push((trade.price, trade.quantity));
                }
            }
            (executions, statuses)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_recent_trades_history() {
        let engine = MatchingEngine::with_trade_history(2);
        limit(&engine, "AAPL", Side::Sell, 15050, 10);
        limit(&engine, "AAPL", Side::Sell, 15060, 10);
        limit(&engine, "AAPL", Side::Sell, 15070, 10);
        limit(&engine, "AAPL", Side::Buy, 15100, 30);

        // Three trades executed, history capped at two
        let trades = engine.recent_trades("AAPL", 10);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].price, 15060);
        assert_eq!(trades[1].price, 15070);

        // Limit below cap takes the newest
        let trades = engine.recent_trades("AAPL", 1);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 15070);

        assert!(engine.recent_trades("TSLA", 10).is_empty());
    }

    #[test]
    fn test_metrics_follow_activity() {
        let engine = MatchingEngine::new();
        limit(&engine, "AAPL", Side::Sell, 15050, 10);
        limit(&engine, "AAPL", Side::Buy, 15050, 10);
        let _ = engine.submit_order("AAPL", Side::Buy, OrderKind::Limit, 0, 10);

        let snapshot = engine.metrics().snapshot();
        assert_eq!(snapshot.orders_received, 3);
        assert_eq!(snapshot.orders_matched, 1);
        assert_eq!(snapshot.orders_rejected, 1);
        assert_eq!(snapshot.trades_executed, 1);
    }

    #[test]
    fn test_concurrent_submissions() {
        const THREADS: usize = 8;
        const ORDERS_PER_THREAD: i64 = 50;

        let engine = Arc::new(MatchingEngine::new());
        let mut order_ids = Vec::new();

        std::thread::scope(|scope| {
            let mut handles = Vec::new();
            for thread in 0..THREADS {
                let engine = Arc::clone(&engine);
                handles.push(scope.spawn(move || {
                    let mut ids = Vec::new();
                    for i in 0..ORDERS_PER_THREAD {
                        // Non-overlapping price bands: sells rest far above
                        // any bid, so nothing ever crosses
                        let (side, price) = if thread % 2 == 0 {
                            (Side::Sell, 20000 + (thread as i64) * 1000 + i)
                        } else {
                            (Side::Buy, 10000 - (thread as i64) * 1000 - i)
                        };
                        let result = engine
                            .submit_order("CONC", side, OrderKind::Limit, price, 10)
                            .unwrap();
                        ids.push(result.order_id);
                    }
                    ids
                }));
            }
            for handle in handles {
                order_ids.extend(handle.join().unwrap());
            }
        });

        // No trades possible, so everything submitted is resting
        let snapshot = engine.order_book_snapshot("CONC", usize::MAX);
        let resting: i64 = snapshot
            .bids
            .iter()
            .chain(snapshot.asks.iter())
            .map(|level| level.quantity)
            .sum();
        assert_eq!(resting, (THREADS as i64) * ORDERS_PER_THREAD * 10);

        // Ladders stay strictly sorted and uncrossed
        let bid_prices: Vec<i64> = snapshot.bids.iter().map(|l| l.price).collect();
        let mut sorted = bid_prices.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(bid_prices, sorted);

        let ask_prices: Vec<i64> = snapshot.asks.iter().map(|l| l.price).collect();
        let mut sorted = ask_prices.clone();
        sorted.sort_unstable();
        assert_eq!(ask_prices, sorted);
        assert!(snapshot.bids[0].price < snapshot.asks[0].price);

        // Every order is retrievable by id
        for id in order_ids {
            let order = engine.get_order(id).unwrap();
            assert_eq!(order.status, OrderStatus::Accepted);
        }
    }

    #[test]
    fn test_concurrent_matching_conserves_quantity() {
        const MAKERS: i64 = 100;

        let engine = Arc::new(MatchingEngine::new());
        for _ in 0..MAKERS {
            limit(&engine, "CONC", Side::Sell, 15000, 1);
        }

        // Competing takers race for the same liquidity
        let filled: i64 = std::thread::scope(|scope| {
            let mut handles = Vec::new();
            for _ in 0..4 {
                let engine = Arc::clone(&engine);
                handles.push(scope.spawn(move || {
                    let mut filled = 0;
                    for _ in 0..(MAKERS / 2) {
                        let result = engine
                            .submit_order("CONC", Side::Buy, OrderKind::Limit, 15000, 1)
                            .unwrap();
                        filled += result.filled_quantity;
                    }
                    filled
                }));
            }
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        // Exactly the maker quantity was consumed; the surplus bids rest
        assert_eq!(filled, MAKERS);
        let snapshot = engine.order_book_snapshot("CONC", usize::MAX);
        assert!(snapshot.asks.is_empty());
        let resting_bids: i64 = snapshot.bids.iter().map(|l| l.quantity).sum();
        assert_eq!(resting_bids, MAKERS);
    }
}
