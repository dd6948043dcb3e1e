//! Cell-by-cell comparison of one sheet across two workbooks.
//!
//! Both sheets are scanned over the union of their extents in row-major
//! order. Coordinates that one workbook never populated read as empty. The
//! scan stops at `max_changes` records, and because the order is fixed the
//! records kept under the cap are always the same ones.

use crate::error::Result;
use crate::workbook::{Sheet, Workbook, read_sheet, read_sheet_names};
use rotadiff_engine::engine::{CellRef, normalize_into};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Cap on difference records collected from a single sheet.
pub const DEFAULT_MAX_CHANGES: usize = 5000;

/// Sheet picked when the caller does not name one and it exists in both workbooks.
pub const DEFAULT_SHEET: &str = "Rota";

/// One coordinate where the two workbooks disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// A1-style address, e.g. "B2".
    #[serde(rename = "Cell")]
    pub cell: String,
    #[serde(rename = "Row")]
    pub row: u32,
    #[serde(rename = "Col")]
    pub col: u32,
    /// Normalized value in workbook A.
    #[serde(rename = "A")]
    pub a: String,
    /// Normalized value in workbook B.
    #[serde(rename = "B")]
    pub b: String,
}

/// Records for one sheet plus whether the cap cut the scan short.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDiff {
    pub sheet: String,
    pub records: Vec<DiffRecord>,
    /// True when at least one more difference exists beyond `records`.
    pub truncated: bool,
}

/// Sheet names present in both workbooks, in workbook A's order.
pub fn common_sheets(xlsx_a: &[u8], xlsx_b: &[u8]) -> Result<Vec<String>> {
    let names_a = read_sheet_names("A", xlsx_a)?;
    let names_b = read_sheet_names("B", xlsx_b)?;
    Ok(names_a
        .into_iter()
        .filter(|name| names_b.contains(name))
        .collect())
}

/// [`common_sheets`] for workbooks that are already decoded.
pub fn common_loaded_sheets(a: &Workbook, b: &Workbook) -> Vec<String> {
    let names_b = b.sheet_names();
    a.sheet_names()
        .into_iter()
        .filter(|name| names_b.contains(name))
        .map(str::to_string)
        .collect()
}

/// The preferred sheet if both workbooks have it, otherwise the first common sheet.
pub fn default_sheet<'a>(common: &'a [String], preferred: &str) -> Option<&'a str> {
    common
        .iter()
        .find(|name| name.as_str() == preferred)
        .or_else(|| common.first())
        .map(String::as_str)
}

/// Every differing cell of `sheet_name`, up to `max_changes` records.
///
/// A sheet missing from either workbook yields no records. Callers that need
/// to know whether the cap was hit should use [`diff_sheet_report`].
///
/// Once the cap is reached the scan continues only to look for one more
/// difference. When the sheet holds exactly `max_changes` differences this
/// reads every remaining cell, without allocating per cell.
pub fn diff_sheet(
    xlsx_a: &[u8],
    xlsx_b: &[u8],
    sheet_name: &str,
    max_changes: usize,
) -> Result<Vec<DiffRecord>> {
    Ok(diff_sheet_report(xlsx_a, xlsx_b, sheet_name, max_changes)?.records)
}

/// Like [`diff_sheet`], also reporting whether the result was truncated.
pub fn diff_sheet_report(
    xlsx_a: &[u8],
    xlsx_b: &[u8],
    sheet_name: &str,
    max_changes: usize,
) -> Result<SheetDiff> {
    let sheet_a = read_sheet("A", xlsx_a, sheet_name)?;
    let sheet_b = read_sheet("B", xlsx_b, sheet_name)?;
    Ok(match (sheet_a, sheet_b) {
        (Some(a), Some(b)) => diff_sheets(&a, &b, max_changes),
        _ => missing_sheet(sheet_name),
    })
}

/// [`diff_sheet_report`] for workbooks that are already decoded.
pub fn diff_loaded_sheet(
    a: &Workbook,
    b: &Workbook,
    sheet_name: &str,
    max_changes: usize,
) -> SheetDiff {
    match (a.sheet(sheet_name), b.sheet(sheet_name)) {
        (Some(a), Some(b)) => diff_sheets(a, b, max_changes),
        _ => missing_sheet(sheet_name),
    }
}

fn missing_sheet(sheet_name: &str) -> SheetDiff {
    debug!(sheet = sheet_name, "sheet not present in both workbooks");
    SheetDiff {
        sheet: sheet_name.to_string(),
        records: Vec::new(),
        truncated: false,
    }
}

/// Row-major scan of two sheets with the same name.
pub fn diff_sheets(a: &Sheet, b: &Sheet, max_changes: usize) -> SheetDiff {
    // An empty sheet still scans as a single cell.
    let max_row = a.max_row.max(1).max(b.max_row.max(1));
    let max_col = a.max_column.max(1).max(b.max_column.max(1));
    debug!(sheet = %a.name, max_row, max_col, "scanning sheet");

    let mut records = Vec::new();
    let mut truncated = false;
    let mut va = String::new();
    let mut vb = String::new();

    'scan: for row in 1..=max_row {
        for col in 1..=max_col {
            let (cell_a, cell_b) = (a.get(row, col), b.get(row, col));
            if cell_a == cell_b {
                continue;
            }
            normalize_into(cell_a, &mut va);
            normalize_into(cell_b, &mut vb);
            if va == vb {
                continue;
            }
            if records.len() >= max_changes {
                truncated = true;
                break 'scan;
            }
            records.push(DiffRecord {
                cell: CellRef::new(row, col).to_string(),
                row,
                col,
                a: va.clone(),
                b: vb.clone(),
            });
        }
    }

    if truncated {
        warn!(
            sheet = %a.name,
            max_changes,
            "difference cap reached; remaining cells not compared"
        );
    }

    SheetDiff {
        sheet: a.name.clone(),
        records,
        truncated,
    }
}
