use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{BookingTable, CellValue, Column, ColumnKind, Dataset, Schema};

/// Field values read as missing, matching the usual dataframe defaults.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Knobs for [`load_file`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Field delimiter for text files; `None` picks one from the extension.
    pub delimiter: Option<u8>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the bookings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited text with a header row
/// * `.tsv`          – tab-delimited text with a header row
/// * `.parquet`      – flat Parquet file (e.g. written by `df.to_parquet()`)
/// * `.json`         – `[{ "arrival_date_year": 2015, ... }, ...]`
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let started = Instant::now();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = open(path)?;
    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(file),
        "json" => load_json(file),
        "tsv" => load_delimited_reader(file, options.delimiter.unwrap_or(b'\t'), None),
        "csv" | "txt" => load_delimited_reader(file, options.delimiter.unwrap_or(b','), None),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} bookings with {} columns from {} in {:.1?}",
        dataset.len(),
        dataset.table.schema.columns.len(),
        path.display(),
        started.elapsed()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    match File::open(path) {
        Ok(f) => Ok(f),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DataError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into()),
        Err(e) => Err(e).with_context(|| format!("opening {}", path.display())),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Parse a delimited table with a header row from any reader.
///
/// With no `schema`, column types are inferred per column: integer if every
/// non-missing field parses as `i64`, float if every one parses as `f64`,
/// text otherwise. With a `schema` (e.g. re-reading an export of a loaded
/// table) the header must name the same columns in the same order and every
/// field must parse as its column's kind.
pub fn load_delimited_reader<R: Read>(
    reader: R,
    delimiter: u8,
    schema: Option<&Schema>,
) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = trim_headers(
        reader
            .headers()
            .map_err(|e| DataError::Parse(format!("header row: {e}")))?
            .iter(),
    )?;

    let mut raw: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::Parse(format!("row {row_no}: {e}")))?;
        raw.push(record.iter().map(str::to_string).collect());
    }

    let schema = match schema {
        Some(known) => {
            if !known.names().eq(headers.iter().map(String::as_str)) {
                return Err(DataError::Parse(format!(
                    "header {headers:?} does not match the expected columns {:?}",
                    known.names().collect::<Vec<_>>()
                ))
                .into());
            }
            known.clone()
        }
        None => {
            let kinds: Vec<ColumnKind> = (0..headers.len())
                .map(|col| infer_text_kind(raw.iter().map(|r| r[col].as_str())))
                .collect();
            Schema {
                columns: headers
                    .into_iter()
                    .zip(kinds)
                    .map(|(name, kind)| Column { name, kind })
                    .collect(),
            }
        }
    };

    let rows = raw
        .into_iter()
        .enumerate()
        .map(|(row, fields)| {
            fields
                .into_iter()
                .zip(&schema.columns)
                .map(|(field, column)| parse_field(field, column, row))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    let table = BookingTable::from_rows(schema, rows)?;
    Ok(Dataset::new(table))
}

fn is_na(field: &str) -> bool {
    NA_TOKENS.contains(&field)
}

/// Text cell, or `Null` for the missing-value tokens. Applied to every
/// source format so a text column never holds a token the CSV reader
/// would read back as missing.
fn text_cell(s: &str) -> CellValue {
    if is_na(s) {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

fn infer_text_kind<'a>(fields: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    let mut any_value = false;
    for field in fields.filter(|f| !is_na(f)) {
        any_value = true;
        if kind == ColumnKind::Integer && field.parse::<i64>().is_ok() {
            continue;
        }
        if field.parse::<f64>().is_ok() {
            kind = ColumnKind::Float;
        } else {
            return ColumnKind::Text;
        }
    }
    if any_value { kind } else { ColumnKind::Float }
}

fn parse_field(field: String, column: &Column, row: usize) -> Result<CellValue, DataError> {
    if is_na(&field) {
        return Ok(CellValue::Null);
    }
    let mismatch = |detail: String| DataError::TypeMismatch {
        column: column.name.clone(),
        row: Some(row),
        detail,
    };
    match column.kind {
        ColumnKind::Integer => field
            .parse()
            .map(CellValue::Integer)
            .map_err(|e| mismatch(format!("{field:?} is not an integer: {e}"))),
        ColumnKind::Float => field
            .parse()
            .map(CellValue::Float)
            .map_err(|e| mismatch(format!("{field:?} is not a number: {e}"))),
        ColumnKind::Text => Ok(CellValue::Text(field)),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "arrival_date_year": 2015, "arrival_date_month": "July", "adr": 98.5, ... },
///   ...
/// ]
/// ```
fn load_json(file: File) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_reader(io::BufReader::new(file))
        .map_err(|e| DataError::Parse(format!("JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::Parse("expected top-level JSON array".into()))?;

    // Distinct raw keys in first-seen order; keys equal after trimming are
    // a duplicate column.
    let mut keys: Vec<&str> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::Parse(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
        objects.push(obj);
    }
    let headers = trim_headers(keys.iter().copied())?;

    let rows: Vec<Vec<CellValue>> = objects
        .iter()
        .map(|obj| {
            let mut row = vec![CellValue::Null; headers.len()];
            for (key, val) in obj.iter() {
                if let Some(col) = keys.iter().position(|k| *k == key.as_str()) {
                    row[col] = json_to_cell(val);
                }
            }
            row
        })
        .collect();

    unify_typed(headers, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Integer(i),
            None => n.as_f64().map_or(CellValue::Null, CellValue::Float),
        },
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file: one column per field, integer, float, string
/// or boolean typed. Works with files written by Pandas and Polars.
fn load_parquet(file: File) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::Parse(format!("parquet metadata: {e}")))?;
    let headers = trim_headers(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataError::Parse(format!("parquet batch: {e}")))?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&headers)
                .map(|(col, name)| extract_cell(col, row, name))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }

    unify_typed(headers, rows)
}

/// Extract a single value from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize, name: &str) -> Result<CellValue, DataError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Text(col.as_boolean().value(row).to_string()),
        other => {
            return Err(DataError::TypeMismatch {
                column: name.to_string(),
                row: None,
                detail: format!("unsupported parquet type {other:?}"),
            })
        }
    };
    Ok(match cell {
        CellValue::Float(v) if v.is_nan() => CellValue::Null,
        c => c,
    })
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn trim_headers<'a>(names: impl Iterator<Item = &'a str>) -> Result<Vec<String>, DataError> {
    let mut headers: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if headers.iter().any(|h| h == name) {
            return Err(DataError::Parse(format!("duplicate column '{name}'")));
        }
        headers.push(name.to_string());
    }
    Ok(headers)
}

/// Settle column kinds for already-typed cells (JSON, Parquet).
///
/// Integer columns with a float anywhere become float; any text makes the
/// whole column text.
fn unify_typed(headers: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Result<Dataset> {
    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| {
            let mut kind = None;
            for cell in rows.iter().map(|r| &r[col]) {
                kind = match (kind, cell) {
                    (_, CellValue::Null) => kind,
                    (_, CellValue::Text(_)) => return ColumnKind::Text,
                    (Some(ColumnKind::Float), _) | (_, CellValue::Float(_)) => {
                        Some(ColumnKind::Float)
                    }
                    (_, CellValue::Integer(_)) => Some(ColumnKind::Integer),
                };
            }
            kind.unwrap_or(ColumnKind::Float)
        })
        .collect();

    for row in &mut rows {
        for (cell, kind) in row.iter_mut().zip(&kinds) {
            let coerced = match (kind, &*cell) {
                (ColumnKind::Float, CellValue::Integer(i)) => CellValue::Float(*i as f64),
                (ColumnKind::Text, c @ (CellValue::Integer(_) | CellValue::Float(_))) => {
                    CellValue::Text(c.to_field())
                }
                _ => continue,
            };
            *cell = coerced;
        }
    }

    finish(headers, kinds, rows)
}

fn finish(
    headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<CellValue>>,
) -> Result<Dataset> {
    let schema = Schema {
        columns: headers
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Column { name, kind })
            .collect(),
    };
    let table = BookingTable::from_rows(schema, rows)?;
    Ok(Dataset::new(table))
}
