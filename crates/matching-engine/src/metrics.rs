//! Engine metrics
//!
//! Lock-free counters updated on the submission path and read by the
//! `/metrics` endpoint. Relaxed ordering is fine: the numbers are
//! operational, not part of the matching semantics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic atomic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Last-written-wins gauge
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Min/max/avg latency tracker
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }

    pub fn record(&self, value_us: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_us, Ordering::Relaxed);
        self.min.fetch_min(value_us, Ordering::Relaxed);
        self.max.fetch_max(value_us, Ordering::Relaxed);
    }

    pub fn stats(&self) -> HistogramStats {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);

        HistogramStats {
            count,
            avg_us: if count > 0 { sum / count } else { 0 },
            min_us: if count > 0 {
                self.min.load(Ordering::Relaxed)
            } else {
                0
            },
            max_us: self.max.load(Ordering::Relaxed),
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
}

/// Counters for the matching engine
#[derive(Debug, Default)]
pub struct EngineMetrics {
    pub orders_received: Counter,
    pub orders_matched: Counter,
    pub orders_rejected: Counter,
    pub orders_cancelled: Counter,
    pub trades_executed: Counter,
    pub match_latency: Histogram,
    /// Resting order count of the most recently touched book
    pub book_depth: Gauge,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_match_latency(&self, elapsed: Duration) {
        self.match_latency.record(elapsed.as_micros() as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency = self.match_latency.stats();

        MetricsSnapshot {
            orders_received: self.orders_received.get(),
            orders_matched: self.orders_matched.get(),
            orders_rejected: self.orders_rejected.get(),
            orders_cancelled: self.orders_cancelled.get(),
            trades_executed: self.trades_executed.get(),
            match_latency_avg_us: latency.avg_us,
            match_latency_max_us: latency.max_us,
            book_depth: self.book_depth.get(),
        }
    }
}

/// Point-in-time view of the metrics, serialized by `/metrics`
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    pub orders_received: u64,
    pub orders_matched: u64,
    pub orders_rejected: u64,
    pub orders_cancelled: u64,
    pub trades_executed: u64,
    pub match_latency_avg_us: u64,
    pub match_latency_max_us: u64,
    pub book_depth: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new();
        counter.increment();
        counter.add(4);
        assert_eq!(counter.get(), 5);
    }

    #[test]
    fn test_histogram_stats() {
        let histogram = Histogram::new();
        assert_eq!(histogram.stats().min_us, 0);
        assert_eq!(histogram.stats().avg_us, 0);

        histogram.record(10);
        histogram.record(30);

        let stats = histogram.stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_us, 20);
        assert_eq!(stats.min_us, 10);
        assert_eq!(stats.max_us, 30);
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = EngineMetrics::new();
        metrics.orders_received.increment();
        metrics.trades_executed.add(3);
        metrics.book_depth.set(7);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.orders_received, 1);
        assert_eq!(snapshot.trades_executed, 3);
        assert_eq!(snapshot.book_depth, 7);
    }
}
