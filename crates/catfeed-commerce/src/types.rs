//! Commerce REST API response types and the validated domain model.
//!
//! ## Observed shapes from live Magento-style stores
//!
//! ### `category_links`
//! Category references live under `extension_attributes.category_links` as
//! objects whose `category_id` is a **numeric string** (`"5"`, not `5`).
//! Older installs omit `extension_attributes` entirely and instead expose a
//! `category_ids` custom attribute whose value is either a JSON array of
//! strings or a single comma-separated string (`"5,7,12"`). Both forms are
//! handled in `extract.rs`.
//!
//! ### `custom_attributes`
//! A list of `{attribute_code, value}` pairs where `value` may be a string,
//! number, or array depending on the attribute. Modeled with
//! `serde_json::Value` and interpreted only where a specific code is needed.
//!
//! ### `price` / `weight`
//! Absent for configurable/bundle parents and virtual products. Modeled as
//! `Option<f64>`.
//!
//! ### Stock items
//! `GET /stockItems/{sku}` reports `qty` as a JSON number that may be
//! fractional for weight-based products, and may be `null` for never-stocked
//! SKUs. `is_in_stock` may be absent on some installs; both default to the
//! out-of-stock reading.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display name substituted when a category detail fetch fails.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown Category";

/// Top-level response from `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductSearchResponse {
    #[serde(default)]
    pub items: Vec<RawProduct>,
    /// Total matching products across all pages, used to derive the page count.
    #[serde(default)]
    pub total_count: u64,
}

/// A single product as returned by the catalog search endpoint, before
/// validation.
#[derive(Debug, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<u64>,

    /// Stock-keeping unit. Required for a product to be usable — items with
    /// a missing or empty SKU are dropped during validation.
    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Absent for configurable parents and virtual products.
    #[serde(default)]
    pub price: Option<f64>,

    /// 1 = enabled, 2 = disabled. Defaults to enabled when absent.
    #[serde(default)]
    pub status: Option<i32>,

    /// `"simple"`, `"configurable"`, `"virtual"`, etc.
    #[serde(default)]
    pub type_id: Option<String>,

    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub extension_attributes: Option<ExtensionAttributes>,

    #[serde(default)]
    pub media_gallery_entries: Vec<MediaGalleryEntry>,

    #[serde(default)]
    pub custom_attributes: Vec<CustomAttribute>,
}

/// `extension_attributes` envelope; only `category_links` is consumed here.
#[derive(Debug, Default, Deserialize)]
pub struct ExtensionAttributes {
    #[serde(default)]
    pub category_links: Vec<CategoryLink>,
}

/// One category assignment. `category_id` arrives as a numeric string.
#[derive(Debug, Deserialize)]
pub struct CategoryLink {
    pub category_id: String,
}

/// A product image/video gallery entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaGalleryEntry {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// One `{attribute_code, value}` pair from `custom_attributes`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomAttribute {
    pub attribute_code: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Response from `GET /categories/{id}`.
#[derive(Debug, Deserialize)]
pub struct CategoryDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_id: u64,
    #[serde(default)]
    pub level: u32,
}

/// Response from `GET /stockItems/{sku}`.
#[derive(Debug, Deserialize)]
pub struct StockItemResponse {
    #[serde(default)]
    pub qty: Option<f64>,
    #[serde(default)]
    pub is_in_stock: bool,
}

/// A validated catalog product.
///
/// Created by the fetcher from [`RawProduct`]; the enrichment merger produces
/// copies with `categories`, `qty`, and `is_in_stock` populated. Products
/// straight out of the fetcher carry the empty/zero defaults for those fields.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u64,
    pub sku: String,
    pub name: String,
    pub price: Option<f64>,
    pub status: i32,
    pub type_id: String,
    pub weight: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Category IDs from `extension_attributes.category_links`, already
    /// parsed. The comma-separated custom-attribute fallback is resolved
    /// lazily in `extract.rs` because it needs `custom_attributes` too.
    pub category_refs: Vec<u64>,
    pub media_entries: Vec<MediaGalleryEntry>,
    pub custom_attributes: Vec<CustomAttribute>,
    /// Populated by the merger; empty until then.
    pub categories: Vec<Category>,
    /// Populated by the merger; 0.0 until then.
    pub qty: f64,
    /// Populated by the merger; false until then.
    pub is_in_stock: bool,
}

impl Product {
    /// Validates a raw API product into a [`Product`].
    ///
    /// Returns `None` when the SKU is missing or empty — such items cannot be
    /// cross-referenced against stock data and are dropped silently.
    #[must_use]
    pub fn from_raw(raw: RawProduct) -> Option<Self> {
        let sku = raw.sku.filter(|s| !s.trim().is_empty())?;

        let category_refs = raw
            .extension_attributes
            .map(|ext| {
                ext.category_links
                    .iter()
                    .filter_map(|link| link.category_id.trim().parse::<u64>().ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id: raw.id.unwrap_or(0),
            sku,
            name: raw.name.unwrap_or_default(),
            price: raw.price,
            status: raw.status.unwrap_or(1),
            type_id: raw.type_id.unwrap_or_else(|| "simple".to_owned()),
            weight: raw.weight,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            category_refs,
            media_entries: raw.media_gallery_entries,
            custom_attributes: raw.custom_attributes,
            categories: Vec::new(),
            qty: 0.0,
            is_in_stock: false,
        })
    }
}

/// A product category, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub parent_id: u64,
    pub level: u32,
}

impl Category {
    /// The degraded value substituted when the category detail fetch fails.
    /// This is documented data, not an error: the export keeps the category
    /// reference with a recognizable name instead of dropping it.
    #[must_use]
    pub fn placeholder(id: u64) -> Self {
        Self {
            id,
            name: UNKNOWN_CATEGORY_NAME.to_owned(),
            parent_id: 0,
            level: 0,
        }
    }
}

impl From<CategoryDetail> for Category {
    fn from(detail: CategoryDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name,
            parent_id: detail.parent_id,
            level: detail.level,
        }
    }
}

/// Stock data for one SKU.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRecord {
    pub sku: String,
    pub qty: f64,
    pub is_in_stock: bool,
}

impl InventoryRecord {
    /// The default substituted when a stock lookup fails or the SKU is
    /// absent upstream.
    #[must_use]
    pub fn out_of_stock(sku: &str) -> Self {
        Self {
            sku: sku.to_owned(),
            qty: 0.0,
            is_in_stock: false,
        }
    }

    /// Builds a record from a stock endpoint response, treating a `null`
    /// qty as zero.
    #[must_use]
    pub fn from_response(sku: String, response: &StockItemResponse) -> Self {
        Self {
            sku,
            qty: response.qty.unwrap_or(0.0),
            is_in_stock: response.is_in_stock,
        }
    }
}

/// Category map type produced by a category enrichment run.
pub type CategoryMap = HashMap<u64, Category>;

/// Inventory map type produced by an inventory enrichment run.
pub type InventoryMap = HashMap<String, InventoryRecord>;
