//! CSV export of difference records

use crate::diff::DiffRecord;
use std::io::Write;

/// Write records as a `Cell,Row,Col,A,B` table.
pub fn write_csv<W: Write>(w: &mut W, records: &[DiffRecord]) -> std::io::Result<()> {
    writeln!(w, "Cell,Row,Col,A,B")?;
    for record in records {
        writeln!(
            w,
            "{},{},{},{},{}",
            record.cell,
            record.row,
            record.col,
            escape_csv_field(&record.a),
            escape_csv_field(&record.b)
        )?;
    }
    Ok(())
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection in spreadsheet apps.
    let first_non_space = field.trim_start_matches([' ', '\t']).chars().next();
    let safe_field = if matches!(first_non_space, Some('=' | '+' | '-' | '@')) {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if safe_field.contains(',')
        || safe_field.contains('"')
        || safe_field.contains('\n')
        || safe_field.contains('\r')
    {
        format!("\"{}\"", safe_field.replace('"', "\"\""))
    } else {
        safe_field
    }
}
