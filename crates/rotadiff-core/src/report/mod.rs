//! Rendering a sheet diff for people and for other tools.

mod csv;
mod json;
mod md;
mod text;

pub use csv::write_csv;
pub use json::write_json;
pub use md::write_markdown;
pub use text::write_text;

use crate::diff::{DiffRecord, SheetDiff};
use crate::summary::{DiffSummary, Hotspot, diff_summary, top_changed_cols, top_changed_rows};
use serde::{Deserialize, Serialize};

/// Records shown in a report's cell-level table.
pub const DEFAULT_SAMPLE: usize = 500;

/// Everything a report shows about one sheet diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub sheet: String,
    pub summary: DiffSummary,
    pub truncated: bool,
    pub max_changes: usize,
    pub top_rows: Vec<Hotspot>,
    pub top_cols: Vec<Hotspot>,
    /// Leading records in scan order.
    pub sample: Vec<DiffRecord>,
}

impl DiffReport {
    pub fn new(diff: &SheetDiff, max_changes: usize, top_n: usize, sample: usize) -> DiffReport {
        DiffReport {
            sheet: diff.sheet.clone(),
            summary: diff_summary(&diff.records),
            truncated: diff.truncated,
            max_changes,
            top_rows: top_changed_rows(&diff.records, top_n),
            top_cols: top_changed_cols(&diff.records, top_n),
            sample: diff.records.iter().take(sample).cloned().collect(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.summary.changed_cells == 0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::diff::{DiffRecord, SheetDiff};

    pub fn record(cell: &str, row: u32, col: u32, a: &str, b: &str) -> DiffRecord {
        DiffRecord {
            cell: cell.to_string(),
            row,
            col,
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn rota_diff() -> SheetDiff {
        SheetDiff {
            sheet: "Rota".to_string(),
            records: vec![
                record("B2", 2, 2, "Alice", "Bob"),
                record("C2", 2, 3, "Night", ""),
                record("B4", 4, 2, "1", "2.5"),
            ],
            truncated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::rota_diff;
    use super::*;

    #[test]
    fn test_report_rollups() {
        let report = DiffReport::new(&rota_diff(), 5000, 30, 500);
        assert_eq!(report.summary.changed_cells, 3);
        assert_eq!(report.summary.changed_rows, 2);
        assert_eq!(report.summary.changed_cols, 2);
        assert_eq!(report.top_rows[0], Hotspot { index: 2, changed_cells: 2 });
        assert_eq!(report.top_cols[0], Hotspot { index: 2, changed_cells: 2 });
        assert!(!report.is_clean());
    }

    #[test]
    fn test_sample_is_a_prefix() {
        let report = DiffReport::new(&rota_diff(), 5000, 30, 2);
        let cells: Vec<&str> = report.sample.iter().map(|r| r.cell.as_str()).collect();
        assert_eq!(cells, vec!["B2", "C2"]);
        // Rollups still cover every record.
        assert_eq!(report.summary.changed_cells, 3);
    }
}
