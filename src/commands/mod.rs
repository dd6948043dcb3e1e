pub mod diff;
pub mod sheets;
pub mod variants;

use anyhow::{Context, Result};
use std::path::Path;

/// Read a whole workbook into memory.
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
