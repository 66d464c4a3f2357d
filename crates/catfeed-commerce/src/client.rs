//! Authenticated HTTP client for the commerce REST API.
//!
//! Wraps `reqwest` with bearer-token auth, typed per-endpoint fetches, and
//! commerce-specific status handling: 429 becomes
//! [`CommerceError::RateLimited`] (honouring `Retry-After`), any other
//! non-2xx becomes [`CommerceError::UnexpectedStatus`]. Every request is
//! routed through [`retry_with_backoff`](crate::retry::retry_with_backoff)
//! so transient failures are absorbed before the caller sees them.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::CommerceError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{CategoryDetail, ProductSearchResponse, StockItemResponse};

/// Field selection sent with every product page request. Keeps response
/// payloads small by excluding description blobs and layout metadata.
const PRODUCT_FIELDS: &str = "items[id,sku,name,price,status,type_id,weight,created_at,updated_at,\
     extension_attributes[category_links[category_id]],\
     media_gallery_entries[file,label,position],custom_attributes],total_count";

/// Client for the commerce REST API.
///
/// Holds the HTTP client, admin bearer token, normalized base URL, and retry
/// policy. Point `base_url` at a wiremock server URI in tests.
pub struct CommerceClient {
    client: Client,
    base_url: Url,
    token: String,
    retry: RetryPolicy,
}

impl CommerceClient {
    /// Creates a client for the REST API rooted at `base_url`
    /// (e.g. `https://shop.example.com/rest/V1`).
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CommerceError::InvalidBaseUrl`] if
    /// `base_url` does not parse or is not an http(s) URL.
    pub fn new(
        base_url: &str,
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, CommerceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends path segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CommerceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CommerceError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }
        let base_url = parsed;

        Ok(Self {
            client,
            base_url,
            token: token.to_owned(),
            retry,
        })
    }

    /// Fetches one page of the product catalog with the fixed field
    /// selection.
    ///
    /// Pages are 1-based. The response carries `total_count` so callers can
    /// derive the overall page count.
    ///
    /// # Errors
    ///
    /// - [`CommerceError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`CommerceError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`CommerceError::Http`] — network failure after all retries exhausted.
    /// - [`CommerceError::Deserialize`] — body does not match the expected shape.
    pub async fn fetch_products_page(
        &self,
        page_size: u32,
        current_page: u32,
    ) -> Result<ProductSearchResponse, CommerceError> {
        let mut url = self.endpoint(&["products"]);
        url.query_pairs_mut()
            .append_pair("searchCriteria[pageSize]", &page_size.to_string())
            .append_pair("searchCriteria[currentPage]", &current_page.to_string())
            .append_pair("fields", PRODUCT_FIELDS);

        let context = format!("products page {current_page}");
        self.get_json(url, &context).await
    }

    /// Fetches the detail record for a single category.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_products_page`].
    pub async fn fetch_category(&self, id: u64) -> Result<CategoryDetail, CommerceError> {
        let url = self.endpoint(&["categories", &id.to_string()]);
        let context = format!("category {id}");
        self.get_json(url, &context).await
    }

    /// Fetches the stock item for a single SKU. The SKU is passed as a path
    /// segment and percent-encoded, so SKUs containing `/` or spaces are safe.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_products_page`].
    pub async fn fetch_stock_item(&self, sku: &str) -> Result<StockItemResponse, CommerceError> {
        let url = self.endpoint(&["stockItems", sku]);
        let context = format!("stock item {sku}");
        self.get_json(url, &context).await
    }

    /// Builds an endpoint URL from the base URL plus percent-encoded path
    /// segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The constructor guarantees a non-opaque http(s) base URL, so
        // path_segments_mut cannot fail here.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends an authenticated GET request under the retry policy, maps the
    /// HTTP status, and parses the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, CommerceError> {
        retry_with_backoff(self.retry, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .bearer_auth(&self.token)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(CommerceError::RateLimited {
                        url: url.to_string(),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(CommerceError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| CommerceError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}
