//! Order matching engine for openmatch
//!
//! This crate implements the core of the exchange: per-symbol order books,
//! the price-time priority matching algorithm, and the engine registry that
//! routes submissions, cancellations, and queries to the right book.
//!
//! # Modules
//!
//! - [`domain`] - orders, trades, and snapshot wire types
//! - [`book`] - the per-symbol ladders and id index
//! - [`engine`] - the symbol → book registry and public operations
//! - [`api`] - axum handlers and router for the HTTP surface
//! - [`metrics`] - lock-free operational counters
//!
//! The core is synchronous: every operation runs to completion under
//! `parking_lot` reader-writer locks with no suspension points, so it can
//! be called directly from async handlers.

pub mod api;
pub mod book;
pub mod domain;
pub mod engine;
pub mod error;
mod matcher;
pub mod metrics;
pub mod result;

pub use engine::MatchingEngine;
pub use error::EngineError;
pub use result::OrderResult;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
