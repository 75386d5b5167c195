//! HTTP routes for the matching engine API
//!
//! Routes:
//! - `POST   /api/v1/orders`             - Submit order
//! - `DELETE /api/v1/orders/:order_id`   - Cancel order
//! - `GET    /api/v1/orders/:order_id`   - Order status
//! - `GET    /api/v1/orderbook/:symbol`  - Depth snapshot (`?depth=D`)
//! - `GET    /api/v1/trades/:symbol`     - Recent trades (`?limit=N`)
//! - `GET    /metrics`                   - Engine metrics

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    cancel_order, get_order, get_order_book, get_trades, metrics, submit_order, ApiState,
};

/// Build the engine's API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/orders", post(submit_order))
        .route(
            "/api/v1/orders/:order_id",
            get(get_order).delete(cancel_order),
        )
        .route("/api/v1/orderbook/:symbol", get(get_order_book))
        .route("/api/v1/trades/:symbol", get(get_trades))
        .route("/metrics", get(metrics))
        .with_state(state)
}
