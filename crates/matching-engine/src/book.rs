//! Per-symbol order book
//!
//! Two price-sorted ladders of FIFO queues plus an id index. The ladders
//! hold order ids; the order records themselves live in `orders`, which
//! retains every order the book has ever seen so terminal orders stay
//! queryable.
//!
//! CRITICAL PROPERTIES:
//! 1. Bids iterate best (highest) price first, asks best (lowest) first
//! 2. Each price level is a strict FIFO queue
//! 3. The book is never crossed at rest
//! 4. A ladder entry always resolves through the id index

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, VecDeque};

use uuid::Uuid;

use crate::domain::{BookSnapshot, Order, OrderKind, OrderStatus, PriceLevel, Side};
use crate::error::EngineError;

/// Order book for a single symbol
#[derive(Debug)]
pub struct OrderBook {
    pub(crate) symbol: String,
    /// Buy ladder, price descending (`Reverse` keys)
    pub(crate) bids: BTreeMap<Reverse<i64>, VecDeque<Uuid>>,
    /// Sell ladder, price ascending
    pub(crate) asks: BTreeMap<i64, VecDeque<Uuid>>,
    /// Every order this book has ever seen, including FILLED and CANCELLED
    pub(crate) orders: HashMap<Uuid, Order>,
    /// Arrival-sequence counter; incremented under the book's exclusive lock
    next_seq: u64,
}

impl OrderBook {
    /// Create an empty book
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Next arrival sequence; callers must hold the book's write lock
    pub fn next_sequence(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Record an order in the id index, whether or not it rests
    pub(crate) fn register(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    /// Rest a limit remainder on its own side of the book
    ///
    /// The level for the order's price is created if absent; within a level
    /// the order goes to the tail (time priority).
    pub fn insert(&mut self, order: &Order) {
        debug_assert_eq!(order.kind, OrderKind::Limit);
        debug_assert!(order.filled < order.quantity);
        debug_assert!(order.status.is_open());

        match order.side {
            Side::Buy => self
                .bids
                .entry(Reverse(order.price))
                .or_default()
                .push_back(order.id),
            Side::Sell => self.asks.entry(order.price).or_default().push_back(order.id),
        }
    }

    /// Cancel a resting order
    ///
    /// Fails with `NotFound` for unknown ids and `NotCancellable` for
    /// orders already in a terminal state. The record stays in the id index
    /// so later status queries still resolve.
    pub fn remove(&mut self, order_id: Uuid) -> Result<Order, EngineError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(EngineError::NotFound(order_id))?;
        if !order.status.is_open() {
            return Err(EngineError::NotCancellable {
                id: order_id,
                status: order.status,
            });
        }

        order.status = OrderStatus::Cancelled;
        let (side, price) = (order.side, order.price);
        let cancelled = order.clone();

        match side {
            Side::Buy => {
                if let Some(queue) = self.bids.get_mut(&Reverse(price)) {
                    queue.retain(|id| *id != order_id);
                    if queue.is_empty() {
                        self.bids.remove(&Reverse(price));
                    }
                }
            }
            Side::Sell => {
                if let Some(queue) = self.asks.get_mut(&price) {
                    queue.retain(|id| *id != order_id);
                    if queue.is_empty() {
                        self.asks.remove(&price);
                    }
                }
            }
        }

        Ok(cancelled)
    }

    /// Highest resting buy price
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.keys().next().map(|Reverse(price)| *price)
    }

    /// Lowest resting sell price
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.keys().next().copied()
    }

    /// Best-ask minus best-bid, when both sides are populated
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Look up any order this book has seen
    pub fn order(&self, order_id: Uuid) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Total remaining quantity resting on one side
    ///
    /// Used for the market-order liquidity precheck.
    pub fn side_liquidity(&self, side: Side) -> i64 {
        match side {
            Side::Buy => self.bids.values().map(|q| self.queue_quantity(q)).sum(),
            Side::Sell => self.asks.values().map(|q| self.queue_quantity(q)).sum(),
        }
    }

    /// Number of orders currently resting in the ladders
    pub fn open_order_count(&self) -> usize {
        self.bids.values().map(VecDeque::len).sum::<usize>()
            + self.asks.values().map(VecDeque::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Top-of-book snapshot with at most `levels` levels per side
    ///
    /// Levels whose aggregate remaining quantity is zero are skipped; a
    /// consistent book never produces one, but the snapshot is cheap to
    /// guard.
    pub fn depth(&self, levels: usize) -> BookSnapshot {
        let bids = self
            .bids
            .iter()
            .take(levels)
            .filter_map(|(Reverse(price), queue)| {
                let quantity = self.queue_quantity(queue);
                (quantity > 0).then_some(PriceLevel {
                    price: *price,
                    quantity,
                })
            })
            .collect();

        let asks = self
            .asks
            .iter()
            .take(levels)
            .filter_map(|(price, queue)| {
                let quantity = self.queue_quantity(queue);
                (quantity > 0).then_some(PriceLevel {
                    price: *price,
                    quantity,
                })
            })
            .collect();

        BookSnapshot {
            symbol: self.symbol.clone(),
            bids,
            asks,
            timestamp: chrono::Utc::now(),
        }
    }

    fn queue_quantity(&self, queue: &VecDeque<Uuid>) -> i64 {
        queue
            .iter()
            .map(|id| {
                self.orders
                    .get(id)
                    .expect("ladder entry missing from order index")
                    .remaining()
            })
            .sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
