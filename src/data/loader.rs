use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{PurchaseDataset, PurchaseRecord};
use crate::error::{LoadError, Result};

/// Columns every input format must provide.
const REQUIRED_COLUMNS: [&str; 4] = ["item", "category", "price", "quantity"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load purchases, falling back to an empty dataset on any failure.
///
/// The failure is reported through `log::error!`; nothing propagates past
/// this function.
pub fn load_purchases(path: impl AsRef<Path>) -> PurchaseDataset {
    let path = path.as_ref();
    match load_file(path) {
        Ok(dataset) => {
            log::info!("Loaded {} purchases from {}", dataset.len(), path.display());
            dataset
        }
        Err(e) => {
            log::error!("Failed to load purchases: {e}");
            PurchaseDataset::empty()
        }
    }
}

/// Load a purchase dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "item": ..., "category": ..., "price": ..., "quantity": ... }, ...]`
/// * `.csv`     – header row naming at least the four required columns
/// * `.parquet` – one column per required field
pub fn load_file(path: &Path) -> Result<PurchaseDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    log::debug!("Loading {} as '{ext}'", path.display());

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "item": "Pen",  "category": "Office", "price": 2,  "quantity": 3 },
///   { "item": "Book", "category": "Books",  "price": 20, "quantity": 1 }
/// ]
/// ```
///
/// Extra keys are allowed and kept on the record.
fn load_json(path: &Path) -> Result<PurchaseDataset> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| LoadError::malformed(path, e))?;

    let rows = match root {
        JsonValue::Array(rows) => rows,
        other => {
            return Err(LoadError::shape(
                path,
                format!("expected a top-level array, found {}", json_kind(&other)),
            ))
        }
    };

    // Shape first, fields second: a non-object anywhere rejects the file.
    if let Some(i) = rows.iter().position(|row| !row.is_object()) {
        return Err(LoadError::shape(
            path,
            format!("row {i} is {}, not an object", json_kind(&rows[i])),
        ));
    }

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            serde_json::from_value::<PurchaseRecord>(row)
                .map_err(|e| LoadError::shape(path, format!("row {i}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PurchaseDataset::from(records))
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names.
/// `item`, `category`, `price` and `quantity` are required; all other columns
/// are kept as extra values with a guessed type.
fn load_csv(path: &Path) -> Result<PurchaseDataset> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::malformed(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut idx = [0usize; 4];
    for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::shape(path, format!("CSV missing '{name}' column")))?;
    }
    let [item_idx, category_idx, price_idx, quantity_idx] = idx;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::malformed(path, e))?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        // NaN/inf parse as f64 but could never come from JSON
        let price = field(price_idx)
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| {
                LoadError::shape(
                    path,
                    format!("row {row_no}: price '{}' is not a finite number", field(price_idx)),
                )
            })?;
        let quantity = field(quantity_idx).parse::<i64>().map_err(|_| {
            LoadError::shape(
                path,
                format!("row {row_no}: quantity '{}' is not an integer", field(quantity_idx)),
            )
        })?;

        let mut extra = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if idx.contains(&col_idx) {
                continue;
            }
            extra.insert(headers[col_idx].clone(), guess_json_value(value.trim()));
        }

        records.push(PurchaseRecord {
            item: field(item_idx).to_string(),
            category: field(category_idx).to_string(),
            price,
            quantity,
            extra,
        });
    }

    Ok(PurchaseDataset::from(records))
}

fn guess_json_value(s: &str) -> JsonValue {
    if s.is_empty() {
        return JsonValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return JsonValue::from(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return JsonValue::from(f);
    }
    if s == "true" || s == "false" {
        return JsonValue::Bool(s == "true");
    }
    JsonValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing purchase records.
///
/// Expected schema:
/// - `item`, `category`: Utf8 or LargeUtf8
/// - `price`: Float64, Float32, Int64 or Int32
/// - `quantity`: Int64 or Int32
/// - Any other columns are ignored
fn load_parquet(path: &Path) -> Result<PurchaseDataset> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::malformed(path, e))?;
    let reader = builder.build().map_err(|e| LoadError::malformed(path, e))?;

    let mut records = Vec::new();

    for (batch_no, batch_result) in reader.enumerate() {
        let batch = batch_result.map_err(|e| LoadError::malformed(path, e))?;
        log::debug!("Parquet batch {batch_no}: {} rows", batch.num_rows());

        let item_col = required_column(path, &batch, "item")?;
        let category_col = required_column(path, &batch, "category")?;
        let price_col = required_column(path, &batch, "price")?;
        let quantity_col = required_column(path, &batch, "quantity")?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let bad = |col: &str| LoadError::shape(path, format!("row {row_no}: invalid or null '{col}'"));

            records.push(PurchaseRecord {
                item: string_at(item_col, row).ok_or_else(|| bad("item"))?,
                category: string_at(category_col, row).ok_or_else(|| bad("category"))?,
                price: f64_at(price_col, row)
                    .filter(|p| p.is_finite())
                    .ok_or_else(|| bad("price"))?,
                quantity: i64_at(quantity_col, row).ok_or_else(|| bad("quantity"))?,
                extra: BTreeMap::new(),
            });
        }
    }

    Ok(PurchaseDataset::from(records))
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(path: &Path, batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::shape(path, format!("Parquet file missing '{name}' column")))
}

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_string_opt::<i32>() {
        Some(arr.value(row).to_string())
    } else {
        col.as_string_opt::<i64>().map(|arr| arr.value(row).to_string())
    }
}

fn f64_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_primitive_opt::<Float64Type>() {
        Some(arr.value(row))
    } else if let Some(arr) = col.as_primitive_opt::<Float32Type>() {
        Some(arr.value(row) as f64)
    } else {
        i64_at(col, row).map(|v| v as f64)
    }
}

fn i64_at(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_primitive_opt::<Int64Type>() {
        Some(arr.value(row))
    } else {
        col.as_primitive_opt::<Int32Type>()
            .map(|arr| arr.value(row) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn json_records_load_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "p.json",
            r#"[{"item":"Pen","category":"Office","price":2,"quantity":3},
                {"item":"Book","category":"Books","price":20.5,"quantity":1}]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0], PurchaseRecord::new("Pen", "Office", 2.0, 3));
        assert_eq!(ds.records()[1].price, 20.5);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }

    #[test]
    fn broken_json_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.json", r#"[{"item": "Pen""#);
        assert!(matches!(load_file(&path), Err(LoadError::MalformedDocument { .. })));
    }

    #[test]
    fn top_level_object_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.json", r#"{"item":"Pen"}"#);
        assert!(matches!(load_file(&path), Err(LoadError::InvalidShape { .. })));
    }

    #[test]
    fn non_object_row_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "p.json",
            r#"[{"item":"Pen","category":"Office","price":2,"quantity":3}, 42]"#,
        );
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("row 1 is a number"), "{err}");
    }

    #[test]
    fn missing_field_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.json", r#"[{"item":"Pen","category":"Office","price":2}]"#);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidShape { .. }));
        assert!(err.to_string().contains("quantity"), "{err}");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.xml", "<purchases/>");
        assert!(matches!(load_file(&path), Err(LoadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn load_purchases_swallows_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_purchases(dir.path().join("missing.json")).is_empty());
        let bad = write_file(&dir, "bad.json", "not json");
        assert!(load_purchases(&bad).is_empty());
    }

    #[test]
    fn csv_with_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "p.csv",
            "item,category,price,quantity,store,discounted\n\
             Pen,Office,2,3,north,false\n\
             Book,Books,20.5,1,,true\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let pen = &ds.records()[0];
        assert_eq!(pen.quantity, 3);
        assert_eq!(pen.extra["store"], JsonValue::from("north"));
        assert_eq!(pen.extra["discounted"], JsonValue::Bool(false));
        assert_eq!(ds.records()[1].extra["store"], JsonValue::Null);
    }

    #[test]
    fn csv_non_finite_price_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        for price in ["NaN", "inf", "-inf"] {
            let path = write_file(
                &dir,
                "p.csv",
                &format!("item,category,price,quantity\nPen,Office,{price},3\nBook,Books,20,1\n"),
            );
            let err = load_file(&path).unwrap_err();
            assert!(matches!(err, LoadError::InvalidShape { .. }), "{price}: {err}");
            assert!(load_purchases(&path).is_empty());
        }
    }

    #[test]
    fn csv_missing_column_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "item,category,price\nPen,Office,2\n");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("'quantity'"), "{err}");
    }

    #[test]
    fn csv_bad_number_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "item,category,price,quantity\nPen,Office,two,3\n");
        assert!(matches!(load_file(&path), Err(LoadError::InvalidShape { .. })));
    }

    #[test]
    fn parquet_roundtrip_with_int32_quantity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("item", DataType::Utf8, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
            Field::new("quantity", DataType::Int32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Pen", "Book"])),
                Arc::new(StringArray::from(vec!["Office", "Books"])),
                Arc::new(Float64Array::from(vec![2.0, 20.0])),
                Arc::new(Int32Array::from(vec![3, 1])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(
            ds.records(),
            &[
                PurchaseRecord::new("Pen", "Office", 2.0, 3),
                PurchaseRecord::new("Book", "Books", 20.0, 1),
            ]
        );
    }

    #[test]
    fn parquet_missing_column_is_invalid_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("item", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Pen"])),
                Arc::new(Float64Array::from(vec![2.0])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("'category'"), "{err}");
    }

    #[test]
    fn garbage_parquet_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.parquet", "definitely not parquet");
        assert!(matches!(load_file(&path), Err(LoadError::MalformedDocument { .. })));
    }
}
