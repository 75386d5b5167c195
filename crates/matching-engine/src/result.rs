//! Result types for matching operations

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Order, OrderStatus, Trade};

/// Terminal record of one submission
#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub filled_quantity: i64,
    /// Positive only when a limit remainder rests on the book
    pub remaining_quantity: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trades: Vec<Trade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OrderResult {
    /// Build the result from the order's terminal state after matching
    pub fn from_order(order: &Order, trades: Vec<Trade>) -> Self {
        let message = match order.status {
            OrderStatus::Filled => "Order fully filled",
            OrderStatus::PartialFill => "Order partially filled and added to book",
            OrderStatus::Accepted => "Order added to book",
            OrderStatus::Cancelled => "Order cancelled",
        };

        Self {
            order_id: order.id,
            status: order.status,
            filled_quantity: order.filled,
            remaining_quantity: order.remaining(),
            trades,
            message: Some(message.to_string()),
        }
    }

    /// Check if any trades were generated
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }
}
