use thiserror::Error;

/// A required column that the input header row does not provide.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingColumn {
    pub name: &'static str,
    /// Header present in the file that matches `name` once case and accents are ignored
    pub hint: Option<String>,
}

/// Errors raised while reading and validating the vendor table.
///
/// Row numbers are 1-based and count data rows only (the header is not row 1).
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no header row")]
    NoHeader,

    #[error("missing required column(s): {}", describe_missing(.0))]
    MissingColumns(Vec<MissingColumn>),

    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: cell {position} has a value but the header has only {columns} columns")]
    CellOutsideHeader {
        row: usize,
        position: usize,
        columns: usize,
    },

    #[error("row {row}: rating '{column}' must be between 1 and 10, got {value}")]
    RatingOutOfRange {
        row: usize,
        column: &'static str,
        value: f64,
    },
}

fn describe_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(|m| match &m.hint {
            Some(hint) => format!("'{}' (found '{}', check spelling and accents)", m.name, hint),
            None => format!("'{}'", m.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
