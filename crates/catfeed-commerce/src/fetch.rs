//! Paginated product catalog fetcher.
//!
//! Walks the `GET /products` search endpoint page by page until the
//! advertised total, the configured page cap, or an empty page is reached.
//! This is the pipeline's single hard-fail point: a page request failure
//! aborts the run, because without the base product list nothing downstream
//! is meaningful. There is no retry at this layer beyond the client's own
//! transient-error policy.

use crate::client::CommerceClient;
use crate::error::CommerceError;
use crate::metrics::PerfTracker;
use crate::types::Product;

/// Page-walk bounds for a catalog fetch.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Products requested per page.
    pub page_size: u32,
    /// Hard cap on pages fetched, regardless of the advertised total.
    pub max_pages: u32,
}

/// Fetches all products across pages, bounded by `pagination.max_pages`.
///
/// Starts at page 1 and continues while `current_page < total_pages` (derived
/// from the response's `total_count`) and `current_page < max_pages`. Stops
/// early on the first empty or short page — upstreams sometimes advertise
/// more pages than they deliver. Items with a missing or empty SKU are dropped
/// during validation.
///
/// Increments the tracker's product counter once per page requested.
///
/// # Errors
///
/// Returns [`CommerceError::PageFetch`] identifying the failing page when any
/// page request fails; the error is fatal and the partial result is discarded.
pub async fn fetch_products(
    client: &CommerceClient,
    pagination: &Pagination,
    tracker: &PerfTracker,
) -> Result<Vec<Product>, CommerceError> {
    let page_size = pagination.page_size.max(1);
    let max_pages = pagination.max_pages.max(1);

    let mut products: Vec<Product> = Vec::new();
    let mut current_page = 1u32;

    loop {
        tracker.record_product_page();
        let response = client
            .fetch_products_page(page_size, current_page)
            .await
            .map_err(|e| CommerceError::PageFetch {
                page: current_page,
                source: Box::new(e),
            })?;

        if response.items.is_empty() {
            tracing::debug!(
                page = current_page,
                "empty product page before advertised total; stopping pagination"
            );
            break;
        }

        let page_item_count = response.items.len();
        products.extend(response.items.into_iter().filter_map(Product::from_raw));

        let total_pages = u32::try_from(response.total_count.div_ceil(u64::from(page_size)))
            .unwrap_or(u32::MAX);

        tracing::debug!(
            page = current_page,
            page_item_count,
            total_count = response.total_count,
            total_pages,
            "fetched product page"
        );

        // A short page means the upstream ran out of items regardless of
        // what total_count advertised.
        if page_item_count < page_size as usize {
            break;
        }
        if current_page >= total_pages || current_page >= max_pages {
            break;
        }
        current_page += 1;
    }

    tracing::info!(
        product_count = products.len(),
        pages = current_page,
        "catalog fetch complete"
    );

    Ok(products)
}
