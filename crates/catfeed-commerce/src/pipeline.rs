//! Pipeline orchestrator: fetch → extract → enrich ×2 → merge.
//!
//! The two enrichment runs (categories, inventory) depend only on the base
//! product list and not on each other, so they execute concurrently; their
//! combined in-flight ceiling is `2 × max_concurrent`. A fetch failure is the
//! run's only fatal outcome — enrichment failures were already absorbed into
//! placeholder values inside the engine.

use std::time::Duration;

use crate::client::CommerceClient;
use crate::enrich::{enrich_in_batches, EnrichOptions};
use crate::error::CommerceError;
use crate::extract::extract_identifiers;
use crate::fetch::{fetch_products, Pagination};
use crate::merge::merge_enrichment;
use crate::metrics::{PerfTracker, PerformanceMetrics};
use crate::types::{Category, InventoryRecord, Product};

/// Tuning knobs for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub pagination: Pagination,
    /// Identifiers per sequential batch for category enrichment.
    pub category_batch_size: usize,
    /// Identifiers per sequential batch for inventory enrichment.
    pub inventory_batch_size: usize,
    /// Maximum in-flight requests per enrichment run.
    pub max_concurrent: usize,
    /// Sleep between enrichment chunks, in milliseconds.
    pub inter_chunk_delay_ms: u64,
}

impl Default for PipelineOptions {
    /// Defaults tuned for a rate-limited upstream: 100-product pages capped
    /// at 20 pages, batches of 25/40, 15 concurrent fetches per dataset,
    /// 80 ms between chunks.
    fn default() -> Self {
        Self {
            pagination: Pagination {
                page_size: 100,
                max_pages: 20,
            },
            category_batch_size: 25,
            inventory_batch_size: 40,
            max_concurrent: 15,
            inter_chunk_delay_ms: 80,
        }
    }
}

/// Result of a pipeline run: enriched products plus call/timing metrics.
#[derive(Debug)]
pub struct PipelineOutput {
    pub products: Vec<Product>,
    pub metrics: PerformanceMetrics,
}

/// Runs the full enrichment pipeline.
///
/// Every product in the output has `categories` and the inventory fields
/// populated, possibly with documented placeholder values where individual
/// enrichment lookups failed.
///
/// # Errors
///
/// Returns [`CommerceError::PageFetch`] if any catalog page request fails;
/// this is the only fatal path. Enrichment lookup failures never surface
/// here — they are logged and substituted inside the engine.
pub async fn fetch_and_enrich_products(
    client: &CommerceClient,
    options: &PipelineOptions,
) -> Result<PipelineOutput, CommerceError> {
    let tracker = PerfTracker::new();

    let products = fetch_products(client, &options.pagination, &tracker).await?;

    let ids = extract_identifiers(&products);
    let unique_categories = ids.category_ids.len();
    tracing::debug!(
        category_ids = unique_categories,
        skus = ids.skus.len(),
        "extracted cross-reference identifiers"
    );

    let category_opts = EnrichOptions {
        batch_size: options.category_batch_size,
        max_concurrent: options.max_concurrent,
        inter_chunk_delay_ms: options.inter_chunk_delay_ms,
    };
    let inventory_opts = EnrichOptions {
        batch_size: options.inventory_batch_size,
        max_concurrent: options.max_concurrent,
        inter_chunk_delay_ms: options.inter_chunk_delay_ms,
    };

    let tracker_ref = &tracker;

    let (categories, inventory) = tokio::join!(
        enrich_in_batches(
            ids.category_ids.iter().copied(),
            &category_opts,
            |id| async move {
                tracker_ref.record_category_call();
                let detail = client.fetch_category(id).await?;
                Ok(Category::from(detail))
            },
            |id| Category::placeholder(*id),
        ),
        enrich_in_batches(
            ids.skus.iter().cloned(),
            &inventory_opts,
            |sku: String| async move {
                tracker_ref.record_stock_call();
                let response = client.fetch_stock_item(&sku).await?;
                Ok(InventoryRecord::from_response(sku, &response))
            },
            |sku| InventoryRecord::out_of_stock(sku),
        ),
    );

    let enriched = merge_enrichment(&products, &categories, &inventory);
    let metrics = tracker.snapshot(enriched.len(), unique_categories);

    tracing::info!(
        products = metrics.processed_products,
        unique_categories = metrics.unique_categories,
        total_api_calls = metrics.total_api_calls,
        elapsed_ms = metrics.elapsed_ms,
        "enrichment pipeline complete"
    );

    Ok(PipelineOutput {
        products: enriched,
        metrics,
    })
}

/// Runs the pipeline under a wall-clock deadline.
///
/// When the deadline fires, in-flight awaits are dropped and the run fails
/// with a single [`CommerceError::DeadlineExceeded`].
///
/// # Errors
///
/// As [`fetch_and_enrich_products`], plus
/// [`CommerceError::DeadlineExceeded`] when `deadline` elapses first.
pub async fn fetch_and_enrich_products_with_deadline(
    client: &CommerceClient,
    options: &PipelineOptions,
    deadline: Duration,
) -> Result<PipelineOutput, CommerceError> {
    let budget_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
    tokio::time::timeout(deadline, fetch_and_enrich_products(client, options))
        .await
        .map_err(|_| CommerceError::DeadlineExceeded { budget_ms })?
}
