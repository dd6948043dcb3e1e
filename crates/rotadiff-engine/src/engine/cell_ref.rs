//! Cell addressing in spreadsheet notation.
//!
//! Coordinates follow workbook conventions: rows and columns are 1-indexed,
//! so `CellRef::new(2, 2)` is `"B2"`.
//!
//! # Examples
//!
//! ```
//! use rotadiff_engine::engine::CellRef;
//!
//! let cell = CellRef::new(10, 28);
//! assert_eq!(cell.to_string(), "AB10");
//! assert_eq!(CellRef::col_to_letters(1), "A");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a cell by 1-indexed row and column.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> CellRef {
        CellRef { row, col }
    }

    /// Convert a 1-indexed column number to letters (1 -> A, 26 -> Z, 27 -> AA).
    ///
    /// Column 0 has no lettering and yields an empty string.
    pub fn col_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row)
    }
}
