//! HTTP API handlers for the matching engine

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{OrderKind, OrderStatus, Side};
use crate::engine::MatchingEngine;
use crate::error::EngineError;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<MatchingEngine>,
    /// Snapshot depth used when the query omits or mangles `depth`
    pub default_depth: usize,
    /// Upper bound on requested snapshot depth
    pub max_depth: usize,
}

impl ApiState {
    pub fn new(engine: Arc<MatchingEngine>, default_depth: usize, max_depth: usize) -> Self {
        Self {
            engine,
            default_depth,
            max_depth,
        }
    }
}

/// Request body for `POST /api/v1/orders`
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    /// Limit price in minor units; ignored for market orders
    #[serde(default)]
    pub price: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct DepthParams {
    pub depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TradesParams {
    pub limit: Option<usize>,
}

const DEFAULT_TRADES_LIMIT: usize = 50;

/// Submit an order
///
/// 201 when a limit rests with no fill, 202 when it partially fills and
/// rests, 200 when it fully fills.
pub async fn submit_order(
    State(state): State<ApiState>,
    Json(req): Json<SubmitOrderRequest>,
) -> Response {
    if req.symbol.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "symbol is required");
    }

    match state
        .engine
        .submit_order(&req.symbol, req.side, req.kind, req.price, req.quantity)
    {
        Ok(result) => {
            let code = match result.status {
                OrderStatus::Accepted => StatusCode::CREATED,
                OrderStatus::PartialFill => StatusCode::ACCEPTED,
                _ => StatusCode::OK,
            };
            (code, Json(result)).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

/// Cancel a resting order
pub async fn cancel_order(
    State(state): State<ApiState>,
    Path(order_id): Path<Uuid>,
) -> Response {
    match state.engine.cancel_order(order_id) {
        Ok(order) => (
            StatusCode::OK,
            Json(json!({
                "order_id": order.id,
                "status": order.status,
            })),
        )
            .into_response(),
        Err(err) => engine_error_response(err),
    }
}

/// Look up an order, live or terminal
pub async fn get_order(State(state): State<ApiState>, Path(order_id): Path<Uuid>) -> Response {
    match state.engine.get_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

/// Depth snapshot of one symbol's book
pub async fn get_order_book(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
    Query(params): Query<DepthParams>,
) -> Response {
    let depth = params
        .depth
        .filter(|depth| *depth > 0)
        .unwrap_or(state.default_depth)
        .min(state.max_depth);

    let snapshot = state.engine.order_book_snapshot(&symbol, depth);
    (StatusCode::OK, Json(snapshot)).into_response()
}

/// Recent trades for one symbol, oldest first
pub async fn get_trades(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
    Query(params): Query<TradesParams>,
) -> Response {
    let limit = params
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_TRADES_LIMIT);
    let trades = state.engine.recent_trades(&symbol, limit);

    (
        StatusCode::OK,
        Json(json!({
            "symbol": symbol,
            "trades": trades,
        })),
    )
        .into_response()
}

/// Engine metrics snapshot
pub async fn metrics(State(state): State<ApiState>) -> Response {
    (StatusCode::OK, Json(state.engine.metrics().snapshot())).into_response()
}

fn engine_error_response(err: EngineError) -> Response {
    let code = match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(code, &err.to_string())
}

fn error_response(code: StatusCode, message: &str) -> Response {
    (code, Json(json!({ "error": message }))).into_response()
}
