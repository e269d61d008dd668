use std::collections::{BTreeMap, BTreeSet};

use super::model::PurchaseDataset;

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// Sum of `price * quantity` over every record. `0.0` for an empty dataset.
pub fn total_revenue(dataset: &PurchaseDataset) -> f64 {
    dataset.iter().fold(0.0, |acc, rec| acc + rec.revenue())
}

// ---------------------------------------------------------------------------
// Category groupings
// ---------------------------------------------------------------------------

/// Distinct item names per category, each set in ascending order.
///
/// Only categories that occur in the dataset are present.
pub fn items_by_category(dataset: &PurchaseDataset) -> BTreeMap<String, BTreeSet<String>> {
    let mut items: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for rec in dataset {
        items
            .entry(rec.category.clone())
            .or_default()
            .insert(rec.item.clone());
    }
    items
}

/// Mean unit price per category, rounded to two decimals.
pub fn average_price_by_category(dataset: &PurchaseDataset) -> BTreeMap<String, f64> {
    // category -> (sum, count)
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in dataset {
        let entry = sums.entry(rec.category.as_str()).or_insert((0.0, 0));
        entry.0 += rec.price;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(category, (sum, count))| (category.to_string(), round2(sum / count as f64)))
        .collect()
}

/// Total units bought per category.
///
/// Totals are widened to `i128`; a category cannot overflow before it holds
/// 2^64 records.
pub fn quantity_by_category(dataset: &PurchaseDataset) -> BTreeMap<String, i128> {
    let mut totals: BTreeMap<String, i128> = BTreeMap::new();
    for rec in dataset {
        *totals.entry(rec.category.clone()).or_default() += i128::from(rec.quantity);
    }
    totals
}

/// The category with the largest total quantity, or `None` for an empty dataset.
///
/// When several categories share the maximum, any one of them may be
/// returned. Callers must not depend on which.
pub fn most_frequent_category(dataset: &PurchaseDataset) -> Option<String> {
    max_category(&quantity_by_category(dataset)).map(|(category, _)| category.to_string())
}

/// Pick a maximal entry out of a per-category quantity table.
pub(crate) fn max_category(totals: &BTreeMap<String, i128>) -> Option<(&str, i128)> {
    totals
        .iter()
        // among equal totals prefer the lexically smaller key
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(category, total)| (category.as_str(), *total))
}

/// Two-decimal rounding with exact ties going to the even digit (1.125 -> 1.12).
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
