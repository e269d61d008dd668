use super::model::{PurchaseDataset, PurchaseRecord};

// ---------------------------------------------------------------------------
// Price threshold filter
// ---------------------------------------------------------------------------

/// Return every purchase whose unit price is at least `min_price`.
///
/// Records keep their original relative order and duplicates are not merged.
pub fn expensive_purchases(dataset: &PurchaseDataset, min_price: f64) -> Vec<&PurchaseRecord> {
    dataset
        .iter()
        .filter(|rec| rec.price >= min_price)
        .collect()
}
