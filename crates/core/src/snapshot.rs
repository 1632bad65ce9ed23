//! Product price snapshots frozen at enrollment time.
//!
//! An enrollment records the recommended products and their discounted
//! prices as of the moment the participant signed up. Later catalog edits
//! must not change an existing enrollee's offer, so the snapshot is stored
//! on the enrollment row as JSON and never recomputed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A product as read from the catalog at enrollment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
}

/// One frozen snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub name: String,
    pub price_cents: i64,
    pub discounted_price_cents: i64,
}

/// Snapshot map keyed by product id. BTreeMap so the stored JSON is
/// deterministic.
pub type ProductSnapshot = BTreeMap<String, SnapshotItem>;

/// Apply a percentage discount to a price in cents, rounding down.
pub fn discounted_price_cents(price_cents: i64, discount_percent: i32) -> i64 {
    price_cents * (100 - discount_percent as i64) / 100
}

/// Reject discount percentages outside `[0, 100]`.
pub fn validate_discount_percent(discount_percent: i32) -> Result<(), CoreError> {
    if !(0..=100).contains(&discount_percent) {
        return Err(CoreError::Validation(format!(
            "discount percent must be between 0 and 100, got {discount_percent}"
        )));
    }
    Ok(())
}

/// Build the snapshot for an enrollment from the catalog products and the
/// challenge's discount percentage.
///
/// Catalog rows with a blank name or a negative price are rejected, so a
/// bad upstream read is never frozen into an enrollment.
pub fn build_snapshot(
    products: &[CatalogProduct],
    discount_percent: i32,
) -> Result<ProductSnapshot, CoreError> {
    validate_discount_percent(discount_percent)?;

    let mut snapshot = ProductSnapshot::new();
    for product in products {
        if product.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "product {} has a blank name",
                product.id
            )));
        }
        if product.price_cents < 0 {
            return Err(CoreError::Validation(format!(
                "product {} has a negative price: {}",
                product.id, product.price_cents
            )));
        }
        snapshot.insert(
            product.id.clone(),
            SnapshotItem {
                name: product.name.clone(),
                price_cents: product.price_cents,
                discounted_price_cents: discounted_price_cents(
                    product.price_cents,
                    discount_percent,
                ),
            },
        );
    }
    Ok(snapshot)
}
