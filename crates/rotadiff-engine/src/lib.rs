//! rotadiff_engine - cell addressing, cell values and comparison normalization.

pub mod engine;

pub use engine::{CellRef, CellValue, normalize};
