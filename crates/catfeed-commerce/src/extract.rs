//! Cross-reference identifier extraction.
//!
//! Pure functions deriving the set of referenced category IDs and the set of
//! SKUs from a product batch. Malformed values (empty strings, non-numeric
//! category IDs) are filtered out silently; they degrade the reference data
//! but are not errors.

use std::collections::BTreeSet;

use crate::types::Product;

/// Attribute code carrying the legacy comma-separated category ID list.
const CATEGORY_IDS_ATTRIBUTE: &str = "category_ids";

/// The category IDs and SKUs referenced by one fetched product batch.
///
/// Backed by ordered sets: set semantics guarantee no duplicates, ordering
/// makes batch partitioning deterministic across runs.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    pub category_ids: BTreeSet<u64>,
    pub skus: BTreeSet<String>,
}

/// Derives the identifier sets for a product batch.
///
/// Category IDs come from each product's parsed category links, falling back
/// to the `category_ids` custom attribute when no links are present. SKUs are
/// collected as-is (validation already rejected empty ones). Products with no
/// category data simply contribute nothing — empty sets are a valid result.
#[must_use]
pub fn extract_identifiers(products: &[Product]) -> IdentifierSet {
    let mut set = IdentifierSet::default();
    for product in products {
        set.category_ids.extend(product_category_ids(product));
        set.skus.insert(product.sku.clone());
    }
    set
}

/// Returns the category IDs referenced by a single product, deduplicated,
/// in first-seen order.
///
/// Prefers the structured `category_links` representation; when that is
/// empty, falls back to the `category_ids` custom attribute, which upstreams
/// deliver either as a JSON array of numeric strings or as one
/// comma-separated string.
#[must_use]
pub fn product_category_ids(product: &Product) -> Vec<u64> {
    let mut ids: Vec<u64> = Vec::new();
    let mut push_unique = |id: u64| {
        if !ids.contains(&id) {
            ids.push(id);
        }
    };

    if product.category_refs.is_empty() {
        for attribute in &product.custom_attributes {
            if attribute.attribute_code != CATEGORY_IDS_ATTRIBUTE {
                continue;
            }
            match &attribute.value {
                serde_json::Value::Array(values) => {
                    for value in values {
                        if let Some(id) = json_category_id(value) {
                            push_unique(id);
                        }
                    }
                }
                serde_json::Value::String(joined) => {
                    for part in joined.split(',') {
                        if let Ok(id) = part.trim().parse::<u64>() {
                            push_unique(id);
                        }
                    }
                }
                _ => {}
            }
        }
    } else {
        for &id in &product.category_refs {
            push_unique(id);
        }
    }

    ids
}

/// Parses one element of a `category_ids` array value, which may be a
/// numeric string or a bare number.
fn json_category_id(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomAttribute, Product};
    use serde_json::json;

    fn product(sku: &str, category_refs: Vec<u64>) -> Product {
        Product {
            id: 1,
            sku: sku.to_owned(),
            name: String::new(),
            price: None,
            status: 1,
            type_id: "simple".to_owned(),
            weight: None,
            created_at: None,
            updated_at: None,
            category_refs,
            media_entries: Vec::new(),
            custom_attributes: Vec::new(),
            categories: Vec::new(),
            qty: 0.0,
            is_in_stock: false,
        }
    }

    fn with_attribute(mut p: Product, code: &str, value: serde_json::Value) -> Product {
        p.custom_attributes.push(CustomAttribute {
            attribute_code: code.to_owned(),
            value,
        });
        p
    }

    #[test]
    fn empty_input_yields_empty_sets() {
        let set = extract_identifiers(&[]);
        assert!(set.category_ids.is_empty());
        assert!(set.skus.is_empty());
    }

    #[test]
    fn deduplicates_category_ids_across_products() {
        let products = vec![
            product("A", vec![5]),
            product("B", vec![5]),
            product("C", vec![7]),
        ];
        let set = extract_identifiers(&products);
        assert_eq!(set.category_ids, BTreeSet::from([5, 7]));
        assert_eq!(
            set.skus,
            BTreeSet::from(["A".to_owned(), "B".to_owned(), "C".to_owned()])
        );
    }

    #[test]
    fn falls_back_to_comma_separated_attribute() {
        let p = with_attribute(
            product("A", vec![]),
            "category_ids",
            json!("5, 7,oops, ,12"),
        );
        assert_eq!(product_category_ids(&p), vec![5, 7, 12]);
    }

    #[test]
    fn falls_back_to_array_attribute() {
        let p = with_attribute(product("A", vec![]), "category_ids", json!(["5", 7, "x"]));
        assert_eq!(product_category_ids(&p), vec![5, 7]);
    }

    #[test]
    fn category_links_take_precedence_over_attribute() {
        let p = with_attribute(product("A", vec![3]), "category_ids", json!("5,7"));
        assert_eq!(product_category_ids(&p), vec![3]);
    }

    #[test]
    fn ignores_unrelated_attributes() {
        let p = with_attribute(product("A", vec![]), "color", json!("5,7"));
        assert!(product_category_ids(&p).is_empty());
    }

    #[test]
    fn deduplicates_within_a_single_product() {
        let p = product("A", vec![5, 5, 7, 5]);
        assert_eq!(product_category_ids(&p), vec![5, 7]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let products = vec![
            with_attribute(product("A", vec![]), "category_ids", json!("9,4")),
            product("B", vec![4, 11]),
        ];
        let first = extract_identifiers(&products);
        let second = extract_identifiers(&products);
        assert_eq!(first, second);
    }
}
