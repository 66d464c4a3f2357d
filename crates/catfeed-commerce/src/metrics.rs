//! Upstream call accounting for a pipeline run.
//!
//! The tracker is the only state shared between concurrent tasks: both
//! enrichment runs increment their counters while in flight, so counts are
//! atomics. Each counter is an independent monotonic tally with no
//! cross-counter invariant, so relaxed ordering is sufficient.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Accumulates API call counts and timing for one pipeline run.
#[derive(Debug)]
pub struct PerfTracker {
    started: Instant,
    product_calls: AtomicU64,
    category_calls: AtomicU64,
    stock_calls: AtomicU64,
}

impl PerfTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            product_calls: AtomicU64::new(0),
            category_calls: AtomicU64::new(0),
            stock_calls: AtomicU64::new(0),
        }
    }

    /// Records one product page request.
    pub fn record_product_page(&self) {
        self.product_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one category detail request.
    pub fn record_category_call(&self) {
        self.category_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one stock item request.
    pub fn record_stock_call(&self) {
        self.stock_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the counters and elapsed time into an immutable snapshot.
    ///
    /// `processed_products` and `unique_categories` come from the caller
    /// since the tracker only observes request counts.
    #[must_use]
    pub fn snapshot(&self, processed_products: usize, unique_categories: usize) -> PerformanceMetrics {
        let product_api_calls = self.product_calls.load(Ordering::Relaxed);
        let category_api_calls = self.category_calls.load(Ordering::Relaxed);
        let stock_api_calls = self.stock_calls.load(Ordering::Relaxed);
        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        PerformanceMetrics {
            product_api_calls,
            category_api_calls,
            stock_api_calls,
            total_api_calls: product_api_calls + category_api_calls + stock_api_calls,
            processed_products,
            unique_categories,
            elapsed_ms,
        }
    }
}

impl Default for PerfTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Final metrics for a pipeline run, read once at the end.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    pub product_api_calls: u64,
    pub category_api_calls: u64,
    pub stock_api_calls: u64,
    pub total_api_calls: u64,
    pub processed_products: usize,
    pub unique_categories: usize,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_sums_all_counters() {
        let tracker = PerfTracker::new();
        tracker.record_product_page();
        tracker.record_product_page();
        tracker.record_category_call();
        tracker.record_stock_call();
        tracker.record_stock_call();
        tracker.record_stock_call();

        let metrics = tracker.snapshot(10, 4);
        assert_eq!(metrics.product_api_calls, 2);
        assert_eq!(metrics.category_api_calls, 1);
        assert_eq!(metrics.stock_api_calls, 3);
        assert_eq!(metrics.total_api_calls, 6);
        assert_eq!(metrics.processed_products, 10);
        assert_eq!(metrics.unique_categories, 4);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let tracker = Arc::new(PerfTracker::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let t = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    t.record_category_call();
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task should not panic");
        }
        assert_eq!(tracker.snapshot(0, 0).category_api_calls, 800);
    }
}
