use std::collections::BTreeSet;
use std::fmt;

use super::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Required columns
// ---------------------------------------------------------------------------

pub const COL_YEAR: &str = "arrival_date_year";
pub const COL_MONTH: &str = "arrival_date_month";
pub const COL_COUNTRY: &str = "country";
pub const COL_ADR: &str = "adr";
pub const COL_SEGMENT: &str = "market_segment";
pub const COL_SPECIAL_REQUESTS: &str = "total_of_special_requests";

/// Canonical calendar order used for the trend chart.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Map a full English month name to 1..=12.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

// ---------------------------------------------------------------------------
// CellValue – a single field of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text written to a delimited export.
    ///
    /// Whole floats keep a trailing `.0` so they are read back as floats.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
            CellValue::Float(v) => v.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered column list of a loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of every integer or float column, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// BookingRecord – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub arrival_year: i64,
    pub arrival_month: String,
    /// ISO-3 code; absent in the source for a handful of bookings.
    pub country: Option<String>,
    pub adr: f64,
    pub market_segment: String,
    pub special_requests: i64,
    /// Every field of the row in schema order.
    pub values: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// BookingTable – the validated, immutable table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BookingTable {
    pub schema: Schema,
    pub records: Vec<BookingRecord>,
}

struct RequiredIndices {
    year: usize,
    month: usize,
    country: usize,
    adr: usize,
    segment: usize,
    special_requests: usize,
}

impl BookingTable {
    /// Validate the required columns and build typed records from raw rows.
    ///
    /// Rows must already be typed according to `schema`.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<CellValue>>) -> DataResult<Self> {
        let idx = |name: &str| {
            schema.index_of(name).ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
            })
        };
        let required = RequiredIndices {
            year: idx(COL_YEAR)?,
            month: idx(COL_MONTH)?,
            country: idx(COL_COUNTRY)?,
            adr: idx(COL_ADR)?,
            segment: idx(COL_SEGMENT)?,
            special_requests: idx(COL_SPECIAL_REQUESTS)?,
        };

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, values)| build_record(&required, row, values))
            .collect::<DataResult<Vec<_>>>()?;

        Ok(BookingTable { schema, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

fn build_record(
    idx: &RequiredIndices,
    row: usize,
    values: Vec<CellValue>,
) -> DataResult<BookingRecord> {
    let cell = |i: usize| values.get(i).unwrap_or(&CellValue::Null);
    let mismatch = |column: &str, detail: String| DataError::TypeMismatch {
        column: column.to_string(),
        row: Some(row),
        detail,
    };

    let arrival_year = match cell(idx.year) {
        CellValue::Integer(y) => *y,
        other => return Err(mismatch(COL_YEAR, format!("expected integer, got {other}"))),
    };
    let arrival_month = match cell(idx.month) {
        CellValue::Text(m) => m.clone(),
        other => return Err(mismatch(COL_MONTH, format!("expected month name, got {other}"))),
    };
    let country = match cell(idx.country) {
        CellValue::Text(c) => Some(c.clone()),
        CellValue::Null => None,
        other => return Err(mismatch(COL_COUNTRY, format!("expected country code, got {other}"))),
    };
    let adr = match cell(idx.adr).as_f64() {
        Some(v) => v,
        None => {
            let got = cell(idx.adr).to_string();
            return Err(mismatch(COL_ADR, format!("expected number, got {got}")));
        }
    };
    let market_segment = match cell(idx.segment) {
        CellValue::Text(s) => s.clone(),
        other => return Err(mismatch(COL_SEGMENT, format!("expected text, got {other}"))),
    };
    let special_requests = match cell(idx.special_requests) {
        CellValue::Integer(n) => *n,
        other => {
            return Err(mismatch(
                COL_SPECIAL_REQUESTS,
                format!("expected integer, got {other}"),
            ))
        }
    };

    Ok(BookingRecord {
        arrival_year,
        arrival_month,
        country,
        adr,
        market_segment,
        special_requests,
        values,
    })
}

// ---------------------------------------------------------------------------
// Dataset – table plus derived columns
// ---------------------------------------------------------------------------

/// The loaded table and the columns derived from it at load time.
///
/// `month_numbers[i]` belongs to `table.records[i]`; `None` marks a month
/// name outside the calendar lookup.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: BookingTable,
    pub month_numbers: Vec<Option<u32>>,
}

impl Dataset {
    pub fn new(table: BookingTable) -> Self {
        let month_numbers = table
            .records
            .iter()
            .map(|r| month_number(&r.arrival_month))
            .collect();
        Dataset {
            table,
            month_numbers,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Distinct arrival years, ascending.
    pub fn years(&self) -> Vec<i64> {
        self.table
            .records
            .iter()
            .map(|r| r.arrival_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct arrival month names in order of first appearance.
    pub fn months(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.table
            .records
            .iter()
            .filter(|r| seen.insert(r.arrival_month.as_str()))
            .map(|r| r.arrival_month.clone())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn schema() -> Schema {
        let col = |name: &str, kind| Column {
            name: name.to_string(),
            kind,
        };
        Schema {
            columns: vec![
                col(COL_YEAR, ColumnKind::Integer),
                col(COL_MONTH, ColumnKind::Text),
                col(COL_COUNTRY, ColumnKind::Text),
                col(COL_ADR, ColumnKind::Float),
                col(COL_SEGMENT, ColumnKind::Text),
                col(COL_SPECIAL_REQUESTS, ColumnKind::Integer),
                col("lead_time", ColumnKind::Integer),
            ],
        }
    }

    /// One raw row in the test schema.
    pub(crate) fn row(
        year: i64,
        month: &str,
        country: Option<&str>,
        adr: f64,
        segment: &str,
        requests: i64,
        lead_time: i64,
    ) -> Vec<CellValue> {
        vec![
            CellValue::Integer(year),
            CellValue::Text(month.to_string()),
            country.map_or(CellValue::Null, |c| CellValue::Text(c.to_string())),
            CellValue::Float(adr),
            CellValue::Text(segment.to_string()),
            CellValue::Integer(requests),
            CellValue::Integer(lead_time),
        ]
    }

    pub(crate) fn sample_dataset() -> Dataset {
        let rows = vec![
            row(2015, "July", Some("PRT"), 100.0, "Online TA", 0, 342),
            row(2015, "July", Some("GBR"), 75.0, "Direct", 1, 13),
            row(2015, "July", Some("PRT"), 200.0, "Offline TA/TO", 2, 14),
            row(2015, "August", Some("ESP"), 120.5, "Online TA", 1, 0),
            row(2016, "July", None, 90.0, "Groups", 0, 60),
            row(2016, "January", Some("FRA"), 60.0, "Online TA", 3, 9),
            row(2017, "July", Some("PRT"), 300.0, "Corporate", 0, 1),
        ];
        Dataset::new(BookingTable::from_rows(schema(), rows).unwrap())
    }

    #[test]
    fn test_month_number_lookup() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("july"), None);
    }

    #[test]
    fn test_missing_required_column() {
        let mut schema = schema();
        schema.columns.retain(|c| c.name != COL_ADR);
        let err = BookingTable::from_rows(schema, Vec::new()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column } if column == COL_ADR));
    }

    #[test]
    fn test_type_mismatch_names_column_and_row() {
        let mut bad = row(2015, "July", Some("PRT"), 1.0, "Direct", 0, 1);
        bad[0] = CellValue::Text("twenty".into());
        let rows = vec![row(2015, "July", Some("PRT"), 1.0, "Direct", 0, 1), bad];
        let err = BookingTable::from_rows(schema(), rows).unwrap_err();
        match err {
            DataError::TypeMismatch { column, row, .. } => {
                assert_eq!(column, COL_YEAR);
                assert_eq!(row, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_derived_months_do_not_touch_table() {
        let ds = sample_dataset();
        assert_eq!(ds.month_numbers.len(), ds.len());
        assert_eq!(ds.month_numbers[0], Some(7));
        assert_eq!(ds.month_numbers[3], Some(8));
        assert_eq!(ds.table.schema.columns.len(), 7);
        assert!(ds.table.schema.index_of("month_num").is_none());
    }

    #[test]
    fn test_years_sorted_and_months_in_appearance_order() {
        let ds = sample_dataset();
        assert_eq!(ds.years(), vec![2015, 2016, 2017]);
        assert_eq!(ds.months(), vec!["July", "August", "January"]);
    }

    #[test]
    fn test_whole_float_field_keeps_decimal() {
        assert_eq!(CellValue::Float(100.0).to_field(), "100.0");
        assert_eq!(CellValue::Float(0.25).to_field(), "0.25");
        assert_eq!(CellValue::Null.to_field(), "");
    }
}
