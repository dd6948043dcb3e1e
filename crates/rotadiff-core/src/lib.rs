//! rotadiff-core - workbook loading, sheet diffing, reports and solver variants.

pub mod diff;
pub mod error;
pub mod report;
pub mod summary;
pub mod variants;
pub mod workbook;

pub use diff::{
    DEFAULT_MAX_CHANGES, DEFAULT_SHEET, DiffRecord, SheetDiff, common_loaded_sheets,
    common_sheets, default_sheet, diff_loaded_sheet, diff_sheet, diff_sheet_report,
};
pub use error::{Result, RotadiffError};
pub use report::DiffReport;
pub use summary::{DEFAULT_TOP_N, DiffSummary, Hotspot, diff_summary, top_changed_cols, top_changed_rows};
pub use workbook::{Sheet, Workbook};

pub use rotadiff_engine::engine::{CellRef, CellValue, normalize};
