//! Rollups over difference records: totals and row/column hotspots.

use crate::diff::DiffRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Number of hotspots returned when the caller has no preference.
pub const DEFAULT_TOP_N: usize = 25;

/// Totals for a set of difference records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub changed_cells: usize,
    pub changed_rows: usize,
    pub changed_cols: usize,
}

/// A row or column and how many of its cells differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub index: u32,
    pub changed_cells: usize,
}

pub fn diff_summary(diffs: &[DiffRecord]) -> DiffSummary {
    let rows: HashSet<u32> = diffs.iter().map(|d| d.row).collect();
    let cols: HashSet<u32> = diffs.iter().map(|d| d.col).collect();
    DiffSummary {
        changed_cells: diffs.len(),
        changed_rows: rows.len(),
        changed_cols: cols.len(),
    }
}

/// Rows with the most differing cells, busiest first.
pub fn top_changed_rows(diffs: &[DiffRecord], top_n: usize) -> Vec<Hotspot> {
    top_changed_by(diffs, top_n, |d| d.row)
}

/// Columns with the most differing cells, busiest first.
pub fn top_changed_cols(diffs: &[DiffRecord], top_n: usize) -> Vec<Hotspot> {
    top_changed_by(diffs, top_n, |d| d.col)
}

/// Count records per key and rank. Equal counts keep first-seen order.
fn top_changed_by(
    diffs: &[DiffRecord],
    top_n: usize,
    key: impl Fn(&DiffRecord) -> u32,
) -> Vec<Hotspot> {
    let mut slots: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<Hotspot> = Vec::new();
    for diff in diffs {
        let index = key(diff);
        let slot = *slots.entry(index).or_insert_with(|| {
            groups.push(Hotspot {
                index,
                changed_cells: 0,
            });
            groups.len() - 1
        });
        groups[slot].changed_cells += 1;
    }

    // sort_by is stable.
    groups.sort_by(|a, b| b.changed_cells.cmp(&a.changed_cells));
    groups.truncate(top_n);
    groups
}
