//! Domain types for the matching engine
//!
//! All monetary values are integers in minor units (e.g. cents) and all
//! quantities are integers. The engine contains no floating point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Order Side
// ============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Returns true if this is a buy order
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ============================================================================
// Order Kind
// ============================================================================

/// Order kind (limit or market)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    /// Rests at its limit price when it cannot fully match
    Limit,
    /// Executes immediately against resting liquidity or is rejected
    Market,
}

impl OrderKind {
    pub fn is_market(&self) -> bool {
        matches!(self, OrderKind::Market)
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Market => write!(f, "MARKET"),
        }
    }
}

// ============================================================================
// Order Status
// ============================================================================

/// Order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Resting with no fills
    Accepted,
    /// Resting with some quantity filled
    PartialFill,
    /// Fully filled (terminal)
    Filled,
    /// Cancelled (terminal)
    Cancelled,
}

impl OrderStatus {
    /// True while the order can still trade or be cancelled
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Accepted | OrderStatus::PartialFill)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Accepted => write!(f, "ACCEPTED"),
            OrderStatus::PartialFill => write!(f, "PARTIAL_FILL"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// A single order
///
/// `sequence` carries the per-book arrival counter that decides time
/// priority. It is assigned under the owning book's exclusive lock and never
/// serialized; wall-clock timestamps are informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "order_id")]
    pub id: Uuid,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    /// Limit price in minor units; zero for market orders
    pub price: i64,
    /// Original order size
    pub quantity: i64,
    /// Cumulative filled quantity, `0 <= filled <= quantity`
    #[serde(rename = "filled_quantity")]
    pub filled: i64,
    pub status: OrderStatus,
    #[serde(skip)]
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order with a fresh id, no fills, status ACCEPTED
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        kind: OrderKind,
        price: i64,
        quantity: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            side,
            kind,
            price,
            quantity,
            filled: 0,
            status: OrderStatus::Accepted,
            sequence: 0,
            created_at: Utc::now(),
        }
    }

    /// Quantity still open
    pub fn remaining(&self) -> i64 {
        self.quantity - self.filled
    }

    /// Record a fill
    pub fn fill(&mut self, quantity: i64) {
        self.filled += quantity;
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled == self.quantity
    }
}

// ============================================================================
// Trade
// ============================================================================

/// A matched execution between two orders
///
/// Immutable once produced. The price is always the resting order's price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    #[serde(rename = "trade_id")]
    pub id: Uuid,
    pub symbol: String,
    pub price: i64,
    pub quantity: i64,
    pub buyer_order_id: Uuid,
    pub seller_order_id: Uuid,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        symbol: impl Into<String>,
        price: i64,
        quantity: i64,
        buyer_order_id: Uuid,
        seller_order_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            price,
            quantity,
            buyer_order_id,
            seller_order_id,
            executed_at: Utc::now(),
        }
    }
}

// ============================================================================
// Book snapshot
// ============================================================================

/// Aggregated quantity at one price, as reported by depth snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: i64,
    /// Sum of remaining quantity across orders at this price
    pub quantity: i64,
}

/// Point-in-time view of the top of an order book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: String,
    /// Best bid first
    pub bids: Vec<PriceLevel>,
    /// Best ask first
    pub asks: Vec<PriceLevel>,
    pub timestamp: DateTime<Utc>,
}

impl BookSnapshot {
    /// Snapshot of a book with no resting orders
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: Vec::new(),
            asks: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
