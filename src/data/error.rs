use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the data layer.
///
/// Load-time variants abort startup; the pipeline variants surface when a
/// correlation column is unusable.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to parse dataset: {0}")]
    Parse(String),

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("column '{column}' has the wrong type{}: {detail}", row_suffix(.row))]
    TypeMismatch {
        column: String,
        row: Option<usize>,
        detail: String,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" (row {r})"),
        None => String::new(),
    }
}

pub type DataResult<T> = std::result::Result<T, DataError>;
