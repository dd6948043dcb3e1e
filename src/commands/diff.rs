use super::read_workbook;
use crate::OutputFormat;
use anyhow::{Context, Result, bail};
use rotadiff_core::report::{write_csv, write_json, write_markdown, write_text};
use rotadiff_core::{DiffReport, common_sheets, default_sheet, diff_sheet_report};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

pub struct DiffOptions {
    pub sheet: Option<String>,
    pub max_changes: usize,
    pub top_n: usize,
    pub sample: usize,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    /// Sheet used when `sheet` is not given and both workbooks have it.
    pub preferred_sheet: String,
}

/// Exit code 0 when the sheet matches, 1 when differences were found.
pub fn run(a: &Path, b: &Path, options: DiffOptions) -> Result<ExitCode> {
    let bytes_a = read_workbook(a)?;
    let bytes_b = read_workbook(b)?;

    let sheet = resolve_sheet(&bytes_a, &bytes_b, options.sheet, &options.preferred_sheet)?;
    debug!(sheet = %sheet, "comparing sheet");

    let diff = diff_sheet_report(&bytes_a, &bytes_b, &sheet, options.max_changes)
        .with_context(|| format!("Failed to compare sheet '{}'", sheet))?;
    let report = DiffReport::new(&diff, options.max_changes, options.top_n, options.sample);

    match options.output {
        Some(path) => {
            let mut file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            render(&mut file, &report, &diff.records, options.format)?;
            eprintln!("Wrote report to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            render(&mut lock, &report, &diff.records, options.format)?;
        }
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn resolve_sheet(
    bytes_a: &[u8],
    bytes_b: &[u8],
    requested: Option<String>,
    preferred: &str,
) -> Result<String> {
    if let Some(sheet) = requested {
        // A sheet missing from either side compares as empty.
        return Ok(sheet);
    }
    let common = common_sheets(bytes_a, bytes_b).context("Failed to list sheets")?;
    match default_sheet(&common, preferred) {
        Some(sheet) => Ok(sheet.to_string()),
        None => bail!("No sheet names are common to both workbooks"),
    }
}

/// Write a report in the requested format. CSV always lists every record.
pub(crate) fn render<W: Write>(
    w: &mut W,
    report: &DiffReport,
    records: &[rotadiff_core::DiffRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(w, report)?,
        OutputFormat::Csv => write_csv(w, records)?,
        OutputFormat::Markdown => write_markdown(w, report)?,
        OutputFormat::Json => write_json(w, report)?,
    }
    w.flush()?;
    Ok(())
}
