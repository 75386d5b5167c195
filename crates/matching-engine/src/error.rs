//! Matching engine error types

use thiserror::Error;
use uuid::Uuid;

use crate::domain::OrderStatus;

/// Errors surfaced by the engine
///
/// All of these are non-fatal: the engine keeps serving other requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Submitted quantity was zero or negative
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    /// Limit order submitted with a non-positive price
    #[error("price must be positive for limit orders, got {0}")]
    InvalidPrice(i64),

    /// Market order larger than the whole opposing side
    #[error("insufficient liquidity: {available} available, {requested} requested")]
    InsufficientLiquidity { available: i64, requested: i64 },

    /// Unknown order id
    #[error("order not found: {0}")]
    NotFound(Uuid),

    /// Cancel attempted on an order already in a terminal state
    #[error("order {id} cannot be cancelled: status is {status}")]
    NotCancellable { id: Uuid, status: OrderStatus },
}
