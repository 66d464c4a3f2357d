pub mod client;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod merge;
pub mod metrics;
pub mod pipeline;
pub mod retry;
pub mod types;

pub use client::CommerceClient;
pub use enrich::{enrich_in_batches, EnrichOptions};
pub use error::CommerceError;
pub use extract::{extract_identifiers, IdentifierSet};
pub use fetch::{fetch_products, Pagination};
pub use merge::merge_enrichment;
pub use metrics::{PerfTracker, PerformanceMetrics};
pub use pipeline::{
    fetch_and_enrich_products, fetch_and_enrich_products_with_deadline, PipelineOptions,
    PipelineOutput,
};
pub use retry::RetryPolicy;
pub use types::{
    Category, CategoryMap, InventoryMap, InventoryRecord, Product, UNKNOWN_CATEGORY_NAME,
};
