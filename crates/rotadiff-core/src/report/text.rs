//! Plain-text rendering for terminals

use super::DiffReport;
use crate::summary::Hotspot;
use rotadiff_engine::engine::CellRef;
use std::io::Write;

/// Longest cell value shown before it is shortened with "...".
const MAX_VALUE_WIDTH: usize = 32;

pub fn write_text<W: Write>(w: &mut W, report: &DiffReport) -> std::io::Result<()> {
    writeln!(w, "Sheet: {}", report.sheet)?;
    writeln!(w, "Changed cells:    {}", report.summary.changed_cells)?;
    writeln!(w, "Rows affected:    {}", report.summary.changed_rows)?;
    writeln!(w, "Columns affected: {}", report.summary.changed_cols)?;

    if report.is_clean() {
        writeln!(w)?;
        writeln!(w, "No differences detected on the selected sheet.")?;
        return Ok(());
    }

    if report.truncated {
        writeln!(
            w,
            "Note: stopped after {} differences; later cells were not compared.",
            report.max_changes
        )?;
    }

    writeln!(w)?;
    writeln!(w, "Top changed rows:")?;
    write_hotspots(w, &report.top_rows, |i| format!("row {}", i))?;

    writeln!(w)?;
    writeln!(w, "Top changed columns:")?;
    write_hotspots(w, &report.top_cols, |i| {
        format!("col {}", CellRef::col_to_letters(i))
    })?;

    writeln!(w)?;
    writeln!(w, "Cell-level differences:")?;
    let cell_width = report
        .sample
        .iter()
        .map(|r| r.cell.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let a_width = report
        .sample
        .iter()
        .map(|r| shorten(&r.a).chars().count())
        .max()
        .unwrap_or(1)
        .max(1);
    writeln!(w, "  {:<cell_width$}  {:<a_width$}  B", "Cell", "A")?;
    for record in &report.sample {
        writeln!(
            w,
            "  {:<cell_width$}  {:<a_width$}  {}",
            record.cell,
            shorten(&record.a),
            shorten(&record.b)
        )?;
    }
    if report.sample.len() < report.summary.changed_cells {
        writeln!(
            w,
            "  ... {} more",
            report.summary.changed_cells - report.sample.len()
        )?;
    }

    Ok(())
}

fn write_hotspots<W: Write>(
    w: &mut W,
    hotspots: &[Hotspot],
    label: impl Fn(u32) -> String,
) -> std::io::Result<()> {
    for hotspot in hotspots {
        writeln!(w, "  {:<10} {}", label(hotspot.index), hotspot.changed_cells)?;
    }
    Ok(())
}

fn shorten(value: &str) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if value.is_empty() {
        return "(empty)".to_string();
    }
    if flat.chars().count() <= MAX_VALUE_WIDTH {
        return flat;
    }
    let mut out: String = flat.chars().take(MAX_VALUE_WIDTH - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::SheetDiff;
    use crate::report::fixtures::rota_diff;

    fn render(report: &DiffReport) -> String {
        let mut out = Vec::new();
        write_text(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_summary_and_tables() {
        let text = render(&DiffReport::new(&rota_diff(), 5000, 30, 500));
        assert!(text.contains("Changed cells:    3"));
        assert!(text.contains("Rows affected:    2"));
        assert!(text.contains("row 2"));
        assert!(text.contains("col B"));
        assert!(text.contains("Alice"));
        assert!(text.contains("(empty)"));
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_text_clean_sheet() {
        let diff = SheetDiff {
            sheet: "Rota".to_string(),
            records: Vec::new(),
            truncated: false,
        };
        let text = render(&DiffReport::new(&diff, 5000, 30, 500));
        assert!(text.ends_with("No differences detected on the selected sheet.\n"));
    }

    #[test]
    fn test_text_truncation_note_and_remainder() {
        let mut diff = rota_diff();
        diff.truncated = true;
        let text = render(&DiffReport::new(&diff, 3, 30, 1));
        assert!(text.contains("stopped after 3 differences"));
        assert!(text.contains("... 2 more"));
    }

    #[test]
    fn test_shorten_long_values() {
        let long = "x".repeat(100);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), MAX_VALUE_WIDTH);
        assert!(short.ends_with("..."));
        assert_eq!(shorten("a\nb"), "a b");
    }
}
