//! Markdown export of a diff report

use super::DiffReport;
use crate::summary::Hotspot;
use rotadiff_engine::engine::CellRef;
use std::io::Write;

/// Write the report as a markdown document.
pub fn write_markdown<W: Write>(w: &mut W, report: &DiffReport) -> std::io::Result<()> {
    writeln!(w, "# Differences on sheet {}", escape_markdown(&report.sheet))?;
    writeln!(w)?;
    writeln!(w, "| Changed cells | Rows affected | Columns affected |")?;
    writeln!(w, "|---|---|---|")?;
    writeln!(
        w,
        "| {} | {} | {} |",
        report.summary.changed_cells, report.summary.changed_rows, report.summary.changed_cols
    )?;
    writeln!(w)?;

    if report.is_clean() {
        writeln!(w, "*No differences detected on the selected sheet.*")?;
        return Ok(());
    }

    if report.truncated {
        writeln!(
            w,
            "> Stopped after {} differences; later cells were not compared.",
            report.max_changes
        )?;
        writeln!(w)?;
    }

    writeln!(w, "## Top changed rows")?;
    writeln!(w)?;
    write_hotspots(w, "Row", &report.top_rows, |i| i.to_string())?;
    writeln!(w)?;

    writeln!(w, "## Top changed columns")?;
    writeln!(w)?;
    write_hotspots(w, "Col", &report.top_cols, |i| {
        format!("{} ({})", CellRef::col_to_letters(i), i)
    })?;
    writeln!(w)?;

    writeln!(w, "## Cell-level differences")?;
    writeln!(w)?;
    writeln!(w, "| Cell | Row | Col | A | B |")?;
    writeln!(w, "|---|---|---|---|---|")?;
    for record in &report.sample {
        writeln!(
            w,
            "| {} | {} | {} | {} | {} |",
            record.cell,
            record.row,
            record.col,
            escape_markdown(&record.a),
            escape_markdown(&record.b)
        )?;
    }
    if report.sample.len() < report.summary.changed_cells {
        writeln!(w)?;
        writeln!(
            w,
            "*Showing {} of {} differences.*",
            report.sample.len(),
            report.summary.changed_cells
        )?;
    }

    Ok(())
}

fn write_hotspots<W: Write>(
    w: &mut W,
    label: &str,
    hotspots: &[Hotspot],
    index: impl Fn(u32) -> String,
) -> std::io::Result<()> {
    writeln!(w, "| {} | ChangedCells |", label)?;
    writeln!(w, "|---|---|")?;
    for hotspot in hotspots {
        writeln!(w, "| {} | {} |", index(hotspot.index), hotspot.changed_cells)?;
    }
    Ok(())
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
