use std::fs::File;
use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{columns, OrderDataset, OrderRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an order dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with a header row (the default source)
/// * `.json`    – `[{ "order_id": "...", ... }, ...]` (records-oriented)
/// * `.parquet` – one column per field; every column is read as text
///
/// The whole load fails on the first bad cell; there is no partial result.
pub fn load_file(path: &Path) -> Result<OrderDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    log::debug!("Loading {} as .{ext}", path.display());

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = OrderDataset::from_records(records);
    log::info!(
        "Loaded {} order rows ({} statuses) from {}",
        dataset.len(),
        dataset.statuses.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<OrderRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let positions = column_positions(|name| headers.iter().position(|h| h == name))?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(csv_err)?;
        let cells: Vec<&str> = positions
            .iter()
            .map(|&idx| record.get(idx).unwrap_or(""))
            .collect();
        records.push(record_from_cells(row, &cells)?);
    }
    Ok(records)
}

/// Resolve each required column to its position in the source, in
/// [`columns::ALL`] order.
fn column_positions(
    lookup: impl Fn(&str) -> Option<usize>,
) -> Result<Vec<usize>, LoadError> {
    columns::ALL
        .iter()
        .map(|&name| lookup(name).ok_or(LoadError::MissingColumn(name)))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `to_json(orient="records")`.
/// Timestamp columns may hold either text or epoch milliseconds.
fn load_json(path: &Path) -> Result<Vec<OrderRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value.as_object().ok_or(LoadError::NotAnObject { row })?;

        let owned = columns::ALL
            .iter()
            .map(|&name| {
                obj.get(name)
                    .map(|v| json_cell(name, v))
                    .ok_or(LoadError::MissingColumn(name))
            })
            .collect::<Result<Vec<String>, LoadError>>()?;
        let cells: Vec<&str> = owned.iter().map(String::as_str).collect();
        records.push(record_from_cells(row, &cells)?);
    }
    Ok(records)
}

fn json_cell(column: &str, value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) if columns::TIMESTAMPS.contains(&column) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string())
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas or Polars.
///
/// Each required column is cast to UTF-8 text and funnelled through the same
/// row conversion as CSV, so native timestamp and numeric columns work as
/// well as string ones. Nulls become empty cells.
fn load_parquet(path: &Path) -> Result<Vec<OrderRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_err = |source| LoadError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(arrow_err)?;
        let schema = batch.schema();
        let positions = column_positions(|name| schema.index_of(name).ok())?;

        let text_columns = positions
            .iter()
            .map(|&idx| arrow::compute::cast(batch.column(idx), &DataType::Utf8))
            .collect::<Result<Vec<_>, _>>()
            .map_err(arrow_err)?;
        let text_columns: Vec<_> = text_columns.iter().map(|c| c.as_string::<i32>()).collect();

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let cells: Vec<&str> = text_columns
                .iter()
                .map(|col| if col.is_null(i) { "" } else { col.value(i) })
                .collect();
            records.push(record_from_cells(row, &cells)?);
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Row conversion shared by every format
// ---------------------------------------------------------------------------

/// One source row, cells ordered as [`columns::ALL`].
struct RowCells<'a> {
    row: usize,
    cells: &'a [&'a str],
}

impl<'a> RowCells<'a> {
    fn raw(&self, column: &'static str) -> &'a str {
        columns::position(column)
            .and_then(|i| self.cells.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn text(&self, column: &'static str) -> Result<String, LoadError> {
        match self.raw(column) {
            "" => Err(LoadError::MissingValue {
                row: self.row,
                column,
            }),
            s => Ok(s.to_string()),
        }
    }

    fn optional_text(&self, column: &'static str) -> Option<String> {
        Some(self.raw(column))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn timestamp(&self, column: &'static str) -> Result<NaiveDateTime, LoadError> {
        self.optional_timestamp(column)?
            .ok_or(LoadError::MissingValue {
                row: self.row,
                column,
            })
    }

    fn optional_timestamp(&self, column: &'static str) -> Result<Option<NaiveDateTime>, LoadError> {
        let value = self.raw(column);
        if value.is_empty() {
            return Ok(None);
        }
        parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| LoadError::InvalidTimestamp {
                row: self.row,
                column,
                value: value.to_string(),
            })
    }

    fn optional_decimal(&self, column: &'static str) -> Result<Option<f64>, LoadError> {
        let value = self.raw(column);
        if value.is_empty() {
            return Ok(None);
        }
        match value.parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(self.invalid_number(column, value)),
        }
    }

    /// Whole quantities. Accepts `2.0` because a dataframe column holding
    /// any missing value is written out as floats.
    fn optional_count(&self, column: &'static str) -> Result<Option<u32>, LoadError> {
        let value = self.raw(column);
        if value.is_empty() {
            return Ok(None);
        }
        if let Ok(n) = value.parse::<u32>() {
            return Ok(Some(n));
        }
        match value.parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(None),
            Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(Some(v as u32)),
            _ => Err(self.invalid_number(column, value)),
        }
    }

    fn invalid_number(&self, column: &'static str, value: &str) -> LoadError {
        LoadError::InvalidNumber {
            row: self.row,
            column,
            value: value.to_string(),
        }
    }
}

fn record_from_cells(row: usize, cells: &[&str]) -> Result<OrderRecord, LoadError> {
    let r = RowCells { row, cells };
    Ok(OrderRecord {
        order_id: r.text(columns::ORDER_ID)?,
        customer_id: r.text(columns::CUSTOMER_ID)?,
        order_status: r.text(columns::ORDER_STATUS)?,
        purchased_at: r.timestamp(columns::PURCHASED_AT)?,
        approved_at: r.optional_timestamp(columns::APPROVED_AT)?,
        delivered_carrier_at: r.optional_timestamp(columns::DELIVERED_CARRIER_AT)?,
        delivered_customer_at: r.optional_timestamp(columns::DELIVERED_CUSTOMER_AT)?,
        estimated_delivery_at: r.optional_timestamp(columns::ESTIMATED_DELIVERY_AT)?,
        customer_state: r.text(columns::CUSTOMER_STATE)?,
        product_category: r.optional_text(columns::PRODUCT_CATEGORY),
        qty_order: r.optional_count(columns::QTY_ORDER)?,
        price: r.optional_decimal(columns::PRICE)?,
        freight_value: r.optional_decimal(columns::FREIGHT_VALUE)?,
        payment_value: r.optional_decimal(columns::PAYMENT_VALUE)?,
        review_score: r.optional_decimal(columns::REVIEW_SCORE)?,
    })
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp cell. A bare date means midnight; an RFC 3339 value with
/// an offset is converted to UTC wall time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "order_id,customer_id,order_status,order_purchase_timestamp,\
order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,\
order_estimated_delivery_date,customer_state,product_category_name_english,qty_order,\
price,freight_value,payment_value,review_score";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2017-10-02 10:56:33"), Some(ts("2017-10-02 10:56:33")));
        assert_eq!(parse_timestamp("2017-10-02T10:56:33"), Some(ts("2017-10-02 10:56:33")));
        assert_eq!(parse_timestamp("2017-10-02 10:56"), Some(ts("2017-10-02 10:56:00")));
        assert_eq!(parse_timestamp("2017-10-02"), Some(ts("2017-10-02 00:00:00")));
        assert_eq!(
            parse_timestamp("2017-10-02T12:56:33+02:00"),
            Some(ts("2017-10-02 10:56:33"))
        );
        assert_eq!(parse_timestamp("02/10/2017"), None);
        assert_eq!(parse_timestamp("not-a-date"), None);
    }

    #[test]
    fn test_csv_with_nullable_cells_and_extra_column() {
        let contents = format!(
            "{HEADER},product_weight_g\n\
o1,c1,delivered,2017-10-02 10:56:33,2017-10-02 11:07:15,,,2017-10-18 00:00:00,SP,,2.0,29.99,8.72,38.71,,500\n"
        );
        let file = write_temp(".csv", &contents);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.purchased_at, ts("2017-10-02 10:56:33"));
        assert_eq!(rec.approved_at, Some(ts("2017-10-02 11:07:15")));
        assert_eq!(rec.delivered_carrier_at, None);
        assert_eq!(rec.product_category, None);
        assert_eq!(rec.qty_order, Some(2));
        assert_eq!(rec.payment_value, Some(38.71));
        assert_eq!(rec.review_score, None);
    }

    #[test]
    fn test_csv_bad_timestamp_fails_whole_load() {
        let contents = format!(
            "{HEADER}\n\
o1,c1,delivered,2017-10-02 10:56:33,,,,,SP,toys,1,1.0,1.0,2.0,5\n\
o2,c2,delivered,2017-10-03 10:00:00,yesterday,,,,SP,toys,1,1.0,1.0,2.0,5\n"
        );
        let file = write_temp(".csv", &contents);
        match load_file(file.path()) {
            Err(LoadError::InvalidTimestamp { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, columns::APPROVED_AT);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_empty_purchase_timestamp_is_rejected() {
        let contents = format!("{HEADER}\no1,c1,delivered,,,,,,SP,toys,1,1.0,1.0,2.0,5\n");
        let file = write_temp(".csv", &contents);
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingValue { row: 1, column: columns::PURCHASED_AT })
        ));
    }

    #[test]
    fn test_csv_missing_column() {
        let header = HEADER.trim_end_matches(",review_score");
        let contents = format!("{header}\n");
        let file = write_temp(".csv", &contents);
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingColumn(columns::REVIEW_SCORE))
        ));
    }

    #[test]
    fn test_csv_bad_number() {
        let contents =
            format!("{HEADER}\no1,c1,delivered,2017-10-02 10:56:33,,,,,SP,toys,one,1.0,1.0,2.0,5\n");
        let file = write_temp(".csv", &contents);
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidNumber { row: 1, column: columns::QTY_ORDER, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_file(Path::new("/nonexistent/orderscope/all_data.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_file(Path::new("orders.xlsx"));
        assert!(matches!(result, Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"));
    }

    #[test]
    fn test_json_records_with_epoch_millis() {
        // 1506941793000 ms = 2017-10-02 10:56:33 UTC
        let contents = r#"[
            {
                "order_id": "o1", "customer_id": "c1", "order_status": "delivered",
                "order_purchase_timestamp": 1506941793000,
                "order_approved_at": "2017-10-02 11:07:15",
                "order_delivered_carrier_date": null,
                "order_delivered_customer_date": null,
                "order_estimated_delivery_date": "2017-10-18",
                "customer_state": "SP",
                "product_category_name_english": "housewares",
                "qty_order": 1, "price": 29.99, "freight_value": 8.72,
                "payment_value": 38.71, "review_score": 4
            }
        ]"#;
        let file = write_temp(".json", contents);
        let ds = load_file(file.path()).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.purchased_at, ts("2017-10-02 10:56:33"));
        assert_eq!(rec.estimated_delivery_at, Some(ts("2017-10-18 00:00:00")));
        assert_eq!(rec.product_category.as_deref(), Some("housewares"));
        assert_eq!(rec.review_score, Some(4.0));
    }

    #[test]
    fn test_json_missing_key_is_missing_column() {
        let file = write_temp(".json", r#"[{"order_id": "o1"}]"#);
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingColumn(columns::CUSTOMER_ID))
        ));
    }

    #[test]
    fn test_parquet_native_columns() {
        use std::sync::Arc;

        use arrow::array::{
            ArrayRef, Float64Array, Int64Array, StringArray, TimestampMillisecondArray,
        };
        use arrow::datatypes::{Field, Schema, TimeUnit};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let text = |values: Vec<Option<&str>>| Arc::new(StringArray::from(values)) as ArrayRef;
        let float = |values: Vec<Option<f64>>| Arc::new(Float64Array::from(values)) as ArrayRef;

        let mut fields = Vec::new();
        let mut arrays: Vec<ArrayRef> = Vec::new();
        for name in columns::ALL {
            let (dtype, array) = match name {
                columns::PURCHASED_AT => (
                    DataType::Timestamp(TimeUnit::Millisecond, None),
                    Arc::new(TimestampMillisecondArray::from(vec![
                        1506941793000,
                        1507028400000,
                    ])) as ArrayRef,
                ),
                columns::QTY_ORDER => (
                    DataType::Int64,
                    Arc::new(Int64Array::from(vec![1, 3])) as ArrayRef,
                ),
                columns::PRICE | columns::FREIGHT_VALUE | columns::PAYMENT_VALUE => {
                    (DataType::Float64, float(vec![Some(10.5), Some(20.0)]))
                }
                columns::REVIEW_SCORE => (DataType::Float64, float(vec![Some(5.0), None])),
                n if columns::TIMESTAMPS.contains(&n) => (DataType::Utf8, text(vec![None, None])),
                columns::PRODUCT_CATEGORY => (DataType::Utf8, text(vec![Some("toys"), None])),
                columns::ORDER_STATUS => {
                    (DataType::Utf8, text(vec![Some("delivered"), Some("shipped")]))
                }
                _ => (DataType::Utf8, text(vec![Some("x1"), Some("x2")])),
            };
            fields.push(Field::new(name, dtype, true));
            arrays.push(array);
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].purchased_at, ts("2017-10-02 10:56:33"));
        assert_eq!(ds.records[1].qty_order, Some(3));
        assert_eq!(ds.records[1].review_score, None);
        assert_eq!(ds.records[1].product_category, None);
        assert_eq!(ds.statuses, vec!["delivered", "shipped"]);
    }
}
