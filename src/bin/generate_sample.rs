use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use purchase_stats::PurchaseRecord;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Integer in `lo..=hi`; modulo reduction, so slightly biased for wide ranges.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }
}

/// (category, [(item, base price)])
const CATALOG: &[(&str, &[(&str, f64)])] = &[
    ("Office", &[("Pen", 2.0), ("Notebook", 4.5), ("Stapler", 7.25)]),
    ("Books", &[("Novel", 12.0), ("Atlas", 30.0), ("Cookbook", 18.5)]),
    ("Food", &[("Tea", 0.8), ("Coffee", 6.0), ("Chocolate", 1.5)]),
    ("Electronics", &[("Cable", 3.0), ("Mouse", 15.0), ("Headphones", 49.9)]),
];

const N_PURCHASES: usize = 60;

fn generate(rng: &mut SimpleRng) -> Vec<PurchaseRecord> {
    (0..N_PURCHASES)
        .map(|_| {
            let (category, items) = CATALOG[rng.range(0, CATALOG.len() as u64 - 1) as usize];
            let (item, base) = items[rng.range(0, items.len() as u64 - 1) as usize];
            // +/- 10% price jitter, kept to cents
            let price = (base * (0.9 + 0.2 * rng.next_f64()) * 100.0).round() / 100.0;
            let quantity = rng.range(1, 5) as i64;
            PurchaseRecord::new(item, category, price, quantity)
        })
        .collect()
}

fn write_json(path: &str, purchases: &[PurchaseRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    serde_json::to_writer_pretty(file, purchases).context("writing JSON")?;
    Ok(())
}

fn write_csv(path: &str, purchases: &[PurchaseRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["item", "category", "price", "quantity"])?;
    for p in purchases {
        writer.write_record([
            p.item.clone(),
            p.category.clone(),
            p.price.to_string(),
            p.quantity.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn to_record_batch(purchases: &[PurchaseRecord]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("item", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("quantity", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from_iter_values(purchases.iter().map(|p| p.item.as_str()))),
            Arc::new(StringArray::from_iter_values(purchases.iter().map(|p| p.category.as_str()))),
            Arc::new(Float64Array::from_iter_values(purchases.iter().map(|p| p.price))),
            Arc::new(Int64Array::from_iter_values(purchases.iter().map(|p| p.quantity))),
        ],
    )
    .context("building RecordBatch")?;
    Ok(batch)
}

fn write_parquet(path: &str, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating writer")?;
    writer.write(batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let purchases = generate(&mut rng);

    write_json("sample_purchases.json", &purchases)?;
    write_csv("sample_purchases.csv", &purchases)?;

    let batch = to_record_batch(&purchases)?;
    write_parquet("sample_purchases.parquet", &batch)?;

    log::info!("Preview:\n{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!(
        "Wrote {} purchases to sample_purchases.{{json,csv,parquet}}",
        purchases.len()
    );
    Ok(())
}
