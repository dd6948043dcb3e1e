//! JSON export of a diff report

use super::DiffReport;
use crate::error::Result;
use std::io::Write;

pub fn write_json<W: Write>(w: &mut W, report: &DiffReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}
