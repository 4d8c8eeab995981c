use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::DataLoadError;
use super::model::{LaunchOutcome, LaunchRecord, LaunchTable};

pub const SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
pub const CLASS_COLUMN: &str = "class";
pub const FLIGHT_COLUMN: &str = "Flight Number";
pub const BOOSTER_COLUMN: &str = "Booster Version";
pub const CATEGORY_COLUMN: &str = "Booster Version Category";

type Result<T> = std::result::Result<T, DataLoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `Launch Site`, `Payload Mass (kg)` and `class` required
/// * `.json`    – `[{ "Launch Site": "...", "Payload Mass (kg)": 500.0, "class": 1 }, ...]`
/// * `.parquet` – flat columns with the same names (string / int / float)
///
/// `Flight Number`, `Booster Version` and `Booster Version Category` are
/// picked up when present; every other column is ignored.
pub fn load_file(path: &Path) -> Result<LaunchTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    let table = LaunchTable::from_records(records).ok_or(DataLoadError::Empty)?;
    log::info!(
        "Loaded {} launches from {} ({} sites, payload {}..={} kg)",
        table.len(),
        path.display(),
        table.sites().len(),
        table.payload_bounds().min(),
        table.payload_bounds().max()
    );
    Ok(table)
}

fn io_error(path: &Path, source: std::io::Error) -> DataLoadError {
    DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Cell validation shared by every format
// ---------------------------------------------------------------------------

fn invalid(row: usize, column: &'static str, value: impl ToString) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn check_payload(row: usize, payload: f64) -> Result<f64> {
    if payload.is_finite() && payload >= 0.0 {
        Ok(payload)
    } else {
        Err(invalid(row, PAYLOAD_COLUMN, payload))
    }
}

fn check_class(row: usize, class: f64) -> Result<LaunchOutcome> {
    if class.fract() != 0.0 {
        return Err(invalid(row, CLASS_COLUMN, class));
    }
    LaunchOutcome::from_class(class as i64).ok_or_else(|| invalid(row, CLASS_COLUMN, class))
}

fn check_flight_number(row: usize, flight: f64) -> Result<i64> {
    if flight.is_finite() && flight.fract() == 0.0 {
        Ok(flight as i64)
    } else {
        Err(invalid(row, FLIGHT_COLUMN, flight))
    }
}

fn parse_number(row: usize, column: &'static str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| invalid(row, column, text))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    read_csv(file)
}

/// Parse CSV launch records from any reader.
pub fn read_csv<R: std::io::Read>(source: R) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let site_idx = position(SITE_COLUMN).ok_or(DataLoadError::MissingColumn(SITE_COLUMN))?;
    let payload_idx =
        position(PAYLOAD_COLUMN).ok_or(DataLoadError::MissingColumn(PAYLOAD_COLUMN))?;
    let class_idx = position(CLASS_COLUMN).ok_or(DataLoadError::MissingColumn(CLASS_COLUMN))?;
    let flight_idx = position(FLIGHT_COLUMN);
    let booster_idx = position(BOOSTER_COLUMN);
    let category_idx = position(CATEGORY_COLUMN);

    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let site = non_empty(cell(site_idx)).ok_or_else(|| invalid(row, SITE_COLUMN, ""))?;
        let payload = check_payload(row, parse_number(row, PAYLOAD_COLUMN, cell(payload_idx))?)?;
        let outcome = check_class(row, parse_number(row, CLASS_COLUMN, cell(class_idx))?)?;
        let flight_number = match flight_idx.and_then(|i| non_empty(cell(i))) {
            Some(text) => Some(
                text.parse::<i64>()
                    .map_err(|_| invalid(row, FLIGHT_COLUMN, &text))?,
            ),
            None => None,
        };

        records.push(LaunchRecord {
            flight_number,
            booster_version: booster_idx.and_then(|i| non_empty(cell(i))),
            booster_category: category_idx.and_then(|i| non_empty(cell(i))),
            ..LaunchRecord::new(site, payload, outcome)
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Launch Site": "CCAFS LC-40", "Payload Mass (kg)": 525.0, "class": 0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Vec<LaunchRecord>> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected top-level JSON array".into()))?;

    rows.iter()
        .enumerate()
        .map(|(row, value)| {
            let obj = value.as_object().ok_or_else(|| {
                DataLoadError::Malformed(format!("row {row} is not a JSON object"))
            })?;
            json_record(row, obj)
        })
        .collect()
}

fn json_record(row: usize, obj: &Map<String, JsonValue>) -> Result<LaunchRecord> {
    let site = match obj.get(SITE_COLUMN) {
        Some(JsonValue::String(s)) => {
            non_empty(s).ok_or_else(|| invalid(row, SITE_COLUMN, s))?
        }
        Some(other) => return Err(invalid(row, SITE_COLUMN, other)),
        None => return Err(DataLoadError::MissingColumn(SITE_COLUMN)),
    };
    let payload = check_payload(row, json_number(row, obj, PAYLOAD_COLUMN)?)?;
    let outcome = check_class(row, json_number(row, obj, CLASS_COLUMN)?)?;

    let flight_number = match obj.get(FLIGHT_COLUMN) {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(v.as_i64().ok_or_else(|| invalid(row, FLIGHT_COLUMN, v))?),
    };

    Ok(LaunchRecord {
        flight_number,
        booster_version: json_text(obj, BOOSTER_COLUMN),
        booster_category: json_text(obj, CATEGORY_COLUMN),
        ..LaunchRecord::new(site, payload, outcome)
    })
}

fn json_number(row: usize, obj: &Map<String, JsonValue>, column: &'static str) -> Result<f64> {
    match obj.get(column) {
        Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| invalid(row, column, n)),
        Some(JsonValue::String(s)) => parse_number(row, column, s),
        Some(other) => Err(invalid(row, column, other)),
        None => Err(DataLoadError::MissingColumn(column)),
    }
}

fn json_text(obj: &Map<String, JsonValue>, column: &str) -> Option<String> {
    obj.get(column).and_then(|v| v.as_str()).and_then(non_empty)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat launch columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); numeric columns may be any of
/// Int32/Int64/Float32/Float64.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let index = |name: &'static str| {
        schema
            .index_of(name)
            .map_err(|_| DataLoadError::MissingColumn(name))
    };
    let site_idx = index(SITE_COLUMN)?;
    let payload_idx = index(PAYLOAD_COLUMN)?;
    let class_idx = index(CLASS_COLUMN)?;
    let flight_idx = index(FLIGHT_COLUMN).ok();
    let booster_idx = index(BOOSTER_COLUMN).ok();
    let category_idx = index(CATEGORY_COLUMN).ok();

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        for i in 0..batch.num_rows() {
            let row = records.len();

            let site = string_at(batch.column(site_idx), i)?
                .and_then(|s| non_empty(&s))
                .ok_or_else(|| invalid(row, SITE_COLUMN, "null"))?;
            let payload = number_at(batch.column(payload_idx), i)?
                .ok_or_else(|| invalid(row, PAYLOAD_COLUMN, "null"))?;
            let class = number_at(batch.column(class_idx), i)?
                .ok_or_else(|| invalid(row, CLASS_COLUMN, "null"))?;

            let flight_number = match flight_idx {
                Some(idx) => match number_at(batch.column(idx), i)? {
                    Some(v) => Some(check_flight_number(row, v)?),
                    None => None,
                },
                None => None,
            };
            let optional_text = |idx: Option<usize>| -> Result<Option<String>> {
                match idx {
                    Some(idx) => Ok(string_at(batch.column(idx), i)?.and_then(|s| non_empty(&s))),
                    None => Ok(None),
                }
            };

            let payload = check_payload(row, payload)?;
            let outcome = check_class(row, class)?;
            records.push(LaunchRecord {
                flight_number,
                booster_version: optional_text(booster_idx)?,
                booster_category: optional_text(category_idx)?,
                ..LaunchRecord::new(site, payload, outcome)
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn unexpected_type(col: &Arc<dyn Array>) -> DataLoadError {
    DataLoadError::Malformed(format!("unexpected column type {:?}", col.data_type()))
}

/// Read a string cell; `None` for nulls.
fn string_at(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| unexpected_type(col))?;
            Ok(Some(arr.value(row).to_string()))
        }
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        _ => Err(unexpected_type(col)),
    }
}

/// Read a numeric cell as `f64`; `None` for nulls.
fn number_at(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    };
    value.map(Some).ok_or_else(|| unexpected_type(col))
}
