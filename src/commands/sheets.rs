use super::read_workbook;
use anyhow::{Context, Result};
use rotadiff_core::common_sheets;
use std::path::Path;
use std::process::ExitCode;

pub fn run(a: &Path, b: &Path) -> Result<ExitCode> {
    let bytes_a = read_workbook(a)?;
    let bytes_b = read_workbook(b)?;
    let sheets = common_sheets(&bytes_a, &bytes_b).context("Failed to list sheets")?;

    if sheets.is_empty() {
        eprintln!("No sheet names are common to both workbooks.");
        return Ok(ExitCode::from(1));
    }
    for sheet in sheets {
        println!("{}", sheet);
    }
    Ok(ExitCode::SUCCESS)
}
