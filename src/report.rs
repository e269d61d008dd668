use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::data::filter::expensive_purchases;
use crate::data::model::{PurchaseDataset, PurchaseRecord};
use crate::data::stats::{
    average_price_by_category, items_by_category, max_category, quantity_by_category,
    total_revenue,
};

// ---------------------------------------------------------------------------
// Report options
// ---------------------------------------------------------------------------

/// Tunables for a report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Inclusive unit-price threshold for the "expensive purchases" line.
    pub min_price: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { min_price: 1.0 }
    }
}

// ---------------------------------------------------------------------------
// Analysis report
// ---------------------------------------------------------------------------

/// Every aggregation over one dataset, computed once.
#[derive(Debug, Clone)]
pub struct AnalysisReport<'a> {
    pub total_revenue: f64,
    pub items_by_category: BTreeMap<String, BTreeSet<String>>,
    pub min_price: f64,
    pub expensive: Vec<&'a PurchaseRecord>,
    pub average_price: BTreeMap<String, f64>,
    /// Winning category and its unit total, if any.
    pub most_frequent: Option<(String, i128)>,
}

impl<'a> AnalysisReport<'a> {
    pub fn build(dataset: &'a PurchaseDataset, options: &ReportOptions) -> Self {
        let quantities = quantity_by_category(dataset);
        let most_frequent =
            max_category(&quantities).map(|(category, total)| (category.to_string(), total));

        Self {
            total_revenue: total_revenue(dataset),
            items_by_category: items_by_category(dataset),
            min_price: options.min_price,
            expensive: expensive_purchases(dataset, options.min_price),
            average_price: average_price_by_category(dataset),
            most_frequent,
        }
    }

    /// Category name of the most purchased category.
    pub fn most_frequent_category(&self) -> Option<&str> {
        self.most_frequent.as_ref().map(|(category, _)| category.as_str())
    }
}

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total revenue: {}", self.total_revenue)?;

        let items = join_or_none(self.items_by_category.iter().map(|(category, items)| {
            let names: Vec<&str> = items.iter().map(String::as_str).collect();
            format!("{category}: [{}]", names.join(", "))
        }));
        writeln!(f, "Items by category: {items}")?;

        let expensive = join_or_none(self.expensive.iter().map(|rec| rec.to_string()));
        writeln!(f, "Purchases priced at or above {}: {expensive}", self.min_price)?;

        let averages = join_or_none(
            self.average_price
                .iter()
                .map(|(category, avg)| format!("{category}: {avg:.2}")),
        );
        writeln!(f, "Average price by category: {averages}")?;

        match &self.most_frequent {
            Some((category, total)) => {
                write!(f, "Most purchased category: {category} ({total} units)")
            }
            None => write!(f, "Most purchased category: none"),
        }
    }
}

fn join_or_none(parts: impl Iterator<Item = String>) -> String {
    let parts: Vec<String> = parts.collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join("; ")
    }
}
