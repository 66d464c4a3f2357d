//! Enrichment merger.
//!
//! Pure, total function attaching category and inventory data onto fetched
//! products by identifier lookup. The input list is never mutated — callers
//! may rely on the original products staying unenriched.

use crate::extract::product_category_ids;
use crate::types::{CategoryMap, InventoryMap, Product};

/// Returns a new product list with `categories`, `qty`, and `is_in_stock`
/// populated from the enrichment maps.
///
/// Category IDs are re-derived with the same logic used for extraction, then
/// resolved against `categories`; IDs missing from the map are filtered out.
/// (When the maps come from the enrichment engine every extracted ID is
/// present, as placeholder if need be, so nothing is filtered in practice.)
/// Inventory lookups that miss default to zero quantity, out of stock —
/// the output never leaves the inventory fields unset.
#[must_use]
pub fn merge_enrichment(
    products: &[Product],
    categories: &CategoryMap,
    inventory: &InventoryMap,
) -> Vec<Product> {
    products
        .iter()
        .map(|product| {
            let mut enriched = product.clone();

            enriched.categories = product_category_ids(product)
                .iter()
                .filter_map(|id| categories.get(id).cloned())
                .collect();

            match inventory.get(&product.sku) {
                Some(record) => {
                    enriched.qty = record.qty;
                    enriched.is_in_stock = record.is_in_stock;
                }
                None => {
                    enriched.qty = 0.0;
                    enriched.is_in_stock = false;
                }
            }

            enriched
        })
        .collect()
}
