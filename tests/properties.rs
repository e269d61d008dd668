//! Properties that must hold for any dataset.

use std::collections::BTreeMap;

use proptest::prelude::*;
use purchase_stats::data::filter::expensive_purchases;
use purchase_stats::data::stats::{
    average_price_by_category, items_by_category, most_frequent_category, quantity_by_category,
    total_revenue,
};
use purchase_stats::{PurchaseDataset, PurchaseRecord};

fn record() -> impl Strategy<Value = PurchaseRecord> {
    (
        prop::sample::select(vec!["Pen", "Book", "Tea", "Lamp", "Cable"]),
        prop::sample::select(vec!["Office", "Books", "Food", "Home"]),
        0u32..10_000,
        1i64..20,
    )
        .prop_map(|(item, category, cents, quantity)| {
            PurchaseRecord::new(item, category, cents as f64 / 100.0, quantity)
        })
}

fn dataset() -> impl Strategy<Value = PurchaseDataset> {
    prop::collection::vec(record(), 0..40).prop_map(PurchaseDataset::from)
}

proptest! {
    #[test]
    fn revenue_is_sum_of_line_totals(ds in dataset()) {
        let expected: f64 = ds.iter().map(|r| r.price * r.quantity as f64).sum();
        prop_assert!((total_revenue(&ds) - expected).abs() < 1e-6);
    }

    #[test]
    fn items_are_sorted_unique_and_correctly_placed(ds in dataset()) {
        for (category, items) in items_by_category(&ds) {
            let items: Vec<String> = items.into_iter().collect();
            prop_assert!(items.windows(2).all(|w| w[0] < w[1]));
            for item in &items {
                prop_assert!(ds.iter().any(|r| &r.item == item && r.category == category));
            }
        }
        for rec in &ds {
            prop_assert!(items_by_category(&ds)[&rec.category].contains(&rec.item));
        }
    }

    #[test]
    fn expensive_is_ordered_subset_and_monotone(ds in dataset(), lo in 0.0f64..100.0, step in 0.0f64..50.0) {
        let hits = expensive_purchases(&ds, lo);
        let expected: Vec<&PurchaseRecord> = ds.iter().filter(|r| r.price >= lo).collect();
        prop_assert_eq!(&hits, &expected);
        prop_assert!(expensive_purchases(&ds, lo + step).len() <= hits.len());
    }

    #[test]
    fn averages_are_rounded_means(ds in dataset()) {
        let mut prices: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for r in &ds {
            prices.entry(r.category.as_str()).or_default().push(r.price);
        }
        let avg = average_price_by_category(&ds);
        prop_assert_eq!(avg.len(), prices.len());
        for (category, ps) in prices {
            let mean = ps.iter().sum::<f64>() / ps.len() as f64;
            prop_assert!((avg[category] - mean).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn most_frequent_has_maximal_quantity(ds in dataset()) {
        let totals = quantity_by_category(&ds);
        match most_frequent_category(&ds) {
            None => prop_assert!(ds.is_empty()),
            Some(winner) => {
                let best = totals[&winner];
                prop_assert!(totals.values().all(|&t| t <= best));
            }
        }
    }
}
