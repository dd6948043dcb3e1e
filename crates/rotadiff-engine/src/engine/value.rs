//! Cell values as read from a workbook.
//!
//! [`CellValue`] is the closed set of things a cell can hold once a workbook
//! has been decoded in computed mode (formulas replaced by their cached
//! results).

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The value stored in a single cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    Temporal(NaiveDateTime),
    /// Time of day with no date part, from a serial in `[0, 1)`.
    Time(NaiveTime),
}

impl CellValue {
    pub fn new_text(text: &str) -> CellValue {
        CellValue::Text(text.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::new_text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Temporal(dt)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::Time(t)
    }
}
