// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Name of the required identifier column.
pub const ID_COLUMN: &str = "id";
/// Name of the required numeric score column.
pub const SCORE_COLUMN: &str = "score";
/// Name of the optional integer column that feeds the flag derivation.
pub const OUTLIERS_COLUMN: &str = "outliers";
/// Name of the derived flag column appended to every table.
pub const FLAGGED_COLUMN: &str = "Flagged";

/// A single cell of a score sheet.
///
/// The variants follow the cell types that spreadsheet readers produce.
/// Columns other than `id`, `score` and `outliers` travel through the
/// pipeline as cells and are only rendered back for comparison views and
/// CSV export.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Numeric coercion: ints and floats convert directly, strings are
    /// trimmed and parsed, booleans count as 0/1. NaN counts as not a
    /// number so that rows carrying it are dropped rather than ranked.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_nan() => None,
            CellValue::Float(f) => Some(*f),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            CellValue::Empty => None,
        }
    }
}

/// Text rendering used for ids, headers, CSV cells and the comparison
/// view. Integral floats render without a trailing `.0` so that sheet
/// integers keep their usual spelling. Empty cells render as the empty
/// string.
impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Empty => Ok(()),
        }
    }
}

/// The derived marker sourced from an `outliers` value of exactly 1.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Flag {
    Yes,
    No,
}

impl Flag {
    pub fn from_outliers(outliers: i64) -> Flag {
        if outliers == 1 {
            Flag::Yes
        } else {
            Flag::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Yes => "Yes",
            Flag::No => "No",
        }
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validated row of candidate data.
///
/// Invariant: `score` is never NaN and `flagged` always reflects
/// `outliers` (`Yes` iff it is exactly 1).
#[derive(PartialEq, Debug, Clone)]
pub struct Record {
    pub id: String,
    pub score: f64,
    pub outliers: i64,
    pub flagged: Flag,
    /// Cells of the passthrough columns, in table column order.
    pub extras: Vec<CellValue>,
}

// ******** Errors *********

/// Errors surfaced by table construction and queries.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableError {
    /// The sheet header does not contain the required columns.
    MissingColumns { missing: Vec<String> },
    /// Top-N was requested with a count below 1.
    InvalidTopCount { count: usize },
    /// A comparison id does not appear in the table.
    UnknownId { id: String },
    /// Both comparison ids name the same candidate.
    SameId { id: String },
    /// The table could not be serialized to CSV.
    CsvWrite,
}

impl Error for TableError {}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::MissingColumns { missing } => {
                write!(f, "the sheet must contain the columns: {}", missing.join(", "))
            }
            TableError::InvalidTopCount { count } => {
                write!(
                    f,
                    "the top performer count may not be less than 1, but it was {}",
                    count
                )
            }
            TableError::UnknownId { id } => write!(f, "no candidate with id {:?}", id),
            TableError::SameId { id } => {
                write!(f, "cannot compare candidate {:?} with itself", id)
            }
            TableError::CsvWrite => write!(f, "failed to serialize the table to CSV"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Int(3).as_number(), Some(3.0));
        assert_eq!(CellValue::Float(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::String(" 42.5 ".to_string()).as_number(), Some(42.5));
        assert_eq!(CellValue::String("abc".to_string()).as_number(), None);
        assert_eq!(CellValue::String("nan".to_string()).as_number(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn text_rendering() {
        assert_eq!(CellValue::Float(123.0).to_string(), "123");
        assert_eq!(CellValue::Float(123.5).to_string(), "123.5");
        assert_eq!(CellValue::Int(7).to_string(), "7");
        assert_eq!(CellValue::String("x".to_string()).to_string(), "x");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn flag_derivation() {
        assert_eq!(Flag::from_outliers(1), Flag::Yes);
        assert_eq!(Flag::from_outliers(0), Flag::No);
        assert_eq!(Flag::from_outliers(2), Flag::No);
        assert_eq!(Flag::from_outliers(-1), Flag::No);
        assert_eq!(Flag::Yes.to_string(), "Yes");
    }
}
