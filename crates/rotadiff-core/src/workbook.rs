//! Read-only workbooks decoded from byte buffers.
//!
//! Buffers are decoded with calamine in computed mode: formula cells carry
//! their cached result and the formula text is never looked at. Each sheet
//! is flattened into a dense grid of [`CellValue`]s anchored at its first
//! populated cell, so out-of-range reads are cheap and always `Empty`.

use crate::error::{Result, RotadiffError};
use calamine::{Data, ExcelDateTime, Range, Reader, Sheets, open_workbook_auto_from_rs};
use chrono::{NaiveTime, TimeDelta};
use rotadiff_engine::engine::CellValue;
use std::io::Cursor;
use tracing::debug;

static EMPTY: CellValue = CellValue::Empty;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const MICROS_PER_DAY: i64 = 86_400_000_000;

/// A single named sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Last populated row (1-indexed), 0 when the sheet is empty.
    pub max_row: u32,
    /// Last populated column (1-indexed), 0 when the sheet is empty.
    pub max_column: u32,
    /// 1-indexed (row, col) of the first stored cell.
    origin: (u32, u32),
    width: u32,
    cells: Vec<CellValue>,
}

impl Sheet {
    /// Build a sheet from row-major values whose first entry sits at A1.
    ///
    /// Rows may have different lengths; short rows are padded with `Empty`.
    pub fn from_rows(name: &str, rows: Vec<Vec<CellValue>>) -> Sheet {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        if height == 0 || width == 0 {
            return Sheet::empty(name);
        }

        let mut cells = Vec::with_capacity((height * width) as usize);
        for mut row in rows {
            row.resize(width as usize, CellValue::Empty);
            cells.extend(row);
        }

        Sheet {
            name: name.to_string(),
            max_row: height,
            max_column: width,
            origin: (1, 1),
            width,
            cells,
        }
    }

    pub fn empty(name: &str) -> Sheet {
        Sheet {
            name: name.to_string(),
            max_row: 0,
            max_column: 0,
            origin: (1, 1),
            width: 0,
            cells: Vec::new(),
        }
    }

    fn from_range(name: &str, range: &Range<Data>) -> Sheet {
        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            return Sheet::empty(name);
        };
        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            return Sheet::empty(name);
        }

        let cells = range
            .rows()
            .flat_map(|row| row.iter().map(cell_value))
            .collect();

        Sheet {
            name: name.to_string(),
            max_row: end.0 + 1,
            max_column: end.1 + 1,
            origin: (start.0 + 1, start.1 + 1),
            width: width as u32,
            cells,
        }
    }

    /// Value at a 1-indexed coordinate; anything outside the populated range is `Empty`.
    pub fn get(&self, row: u32, col: u32) -> &CellValue {
        if row < self.origin.0 || col < self.origin.1 || row > self.max_row || col > self.max_column
        {
            return &EMPTY;
        }
        let r = (row - self.origin.0) as usize;
        let c = (col - self.origin.1) as usize;
        self.cells
            .get(r * self.width as usize + c)
            .unwrap_or(&EMPTY)
    }
}

/// A decoded workbook: its sheets in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Decode every sheet of a workbook buffer.
    ///
    /// `label` names the buffer in error messages (e.g. "A" or a file path).
    pub fn from_bytes(label: &str, bytes: &[u8]) -> Result<Workbook> {
        let mut workbook = open(label, bytes)?;
        let names: Vec<String> = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());
        for name in &names {
            let range = read_range(&mut workbook, name)?;
            sheets.push(Sheet::from_range(name, &range));
        }
        debug!(workbook = label, sheets = sheets.len(), "decoded workbook");
        Ok(Workbook { sheets })
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// List the sheet names of a workbook buffer without decoding any cells.
pub fn read_sheet_names(label: &str, bytes: &[u8]) -> Result<Vec<String>> {
    let workbook = open(label, bytes)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Decode a single sheet of a workbook buffer, or `None` if it has no such sheet.
pub fn read_sheet(label: &str, bytes: &[u8], name: &str) -> Result<Option<Sheet>> {
    let mut workbook = open(label, bytes)?;
    if !workbook.sheet_names().iter().any(|n| n == name) {
        return Ok(None);
    }
    let range = read_range(&mut workbook, name)?;
    let sheet = Sheet::from_range(name, &range);
    debug!(
        workbook = label,
        sheet = name,
        max_row = sheet.max_row,
        max_column = sheet.max_column,
        "decoded sheet"
    );
    Ok(Some(sheet))
}

fn open<'a>(label: &str, bytes: &'a [u8]) -> Result<Sheets<Cursor<&'a [u8]>>> {
    open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| RotadiffError::Workbook {
        which: label.to_string(),
        message: e.to_string(),
    })
}

fn read_range(workbook: &mut Sheets<Cursor<&[u8]>>, name: &str) -> Result<Range<Data>> {
    workbook
        .worksheet_range(name)
        .map_err(|e| RotadiffError::Sheet {
            sheet: name.to_string(),
            message: e.to_string(),
        })
}

/// Map a decoded calamine cell onto the closed value type.
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => date_time_value(dt),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Durations become `H:MM:SS` text, serials in `[0, 1)` a time of day,
/// anything else a full timestamp.
fn date_time_value(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return match dt.as_duration() {
            Some(d) => CellValue::Text(duration_text(d)),
            None => CellValue::Number(dt.as_f64()),
        };
    }
    if let Some(t) = time_of_day(dt.as_f64()) {
        return CellValue::Time(t);
    }
    match dt.as_datetime() {
        Some(ndt) => CellValue::Temporal(ndt),
        // Serial outside the calendar range.
        None => CellValue::Number(dt.as_f64()),
    }
}

/// Time of day for a serial in `[0, 1)`, rounded to the millisecond.
///
/// A fraction that rounds up to midnight is not a time of day.
fn time_of_day(serial: f64) -> Option<NaiveTime> {
    if !(0.0..1.0).contains(&serial) {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(millis / 1_000, (millis % 1_000) * 1_000_000)
}

/// `7:30:00`, `1 day, 2:00:00`, `-1 day, 23:00:00.500000`.
fn duration_text(d: TimeDelta) -> String {
    let Some(total) = d.num_microseconds() else {
        return d.to_string();
    };
    let days = total.div_euclid(MICROS_PER_DAY);
    let rest = total.rem_euclid(MICROS_PER_DAY);
    let secs = rest / 1_000_000;
    let micros = rest % 1_000_000;

    let mut text = format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        text = format!("{} day{}, {}", days, plural, text);
    }
    if micros != 0 {
        text.push_str(&format!(".{:06}", micros));
    }
    text
}
