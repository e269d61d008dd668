use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// PurchaseRecord – one row of the purchase log
// ---------------------------------------------------------------------------

/// A single purchase entry.
///
/// The four named fields are required; anything else found on the source
/// object is carried along untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Product name.
    pub item: String,
    /// Product category.
    pub category: String,
    /// Unit price. JSON integers are accepted and widened.
    pub price: f64,
    /// Number of units bought.
    pub quantity: i64,
    /// Additional source columns, keyed by name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl PurchaseRecord {
    /// Build a record with no extra columns.
    pub fn new(
        item: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            item: item.into(),
            category: category.into(),
            price,
            quantity,
            extra: BTreeMap::new(),
        }
    }

    /// `price * quantity` for this line.
    pub fn revenue(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

impl fmt::Display for PurchaseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} x {}",
            self.item, self.category, self.price, self.quantity
        )
    }
}

// ---------------------------------------------------------------------------
// PurchaseDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All purchase records of one run, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseDataset {
    records: Vec<PurchaseRecord>,
}

impl PurchaseDataset {
    /// An empty dataset ("nothing to analyze").
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PurchaseRecord> {
        self.records.iter()
    }
}

impl From<Vec<PurchaseRecord>> for PurchaseDataset {
    fn from(records: Vec<PurchaseRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<PurchaseRecord> for PurchaseDataset {
    fn from_iter<I: IntoIterator<Item = PurchaseRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PurchaseDataset {
    type Item = &'a PurchaseRecord;
    type IntoIter = std::slice::Iter<'a, PurchaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
