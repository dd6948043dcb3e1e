//! Cell model API.
//!
//! - [`CellRef`] - 1-indexed cell addresses and A1 column lettering
//! - [`CellValue`] - The closed set of values a decoded cell can hold
//! - [`normalize`] - Collapse a value to its canonical comparison string

mod cell_ref;
mod format;
mod value;

pub use cell_ref::CellRef;
pub use format::{INTEGER_TOLERANCE, format_general, normalize, normalize_into, normalize_number};
pub use value::CellValue;
