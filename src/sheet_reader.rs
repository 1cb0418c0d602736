use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook, open_workbook_from_rs};
use chrono::{NaiveDateTime, NaiveTime};

use crate::error::CleanError;
use crate::model::{Cell, RawSheet};

pub(crate) fn read_sheet_bytes(bytes: &[u8]) -> Result<RawSheet, CleanError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    first_sheet(&mut workbook)
}

pub(crate) fn read_sheet_path(path: &Path) -> Result<RawSheet, CleanError> {
    let mut workbook: Xlsx<BufReader<File>> = open_workbook(path)?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<RawSheet, CleanError> {
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Err(CleanError::NoWorksheets);
    };

    let range = workbook.worksheet_range(first)?;
    Ok(RawSheet {
        rows: range_to_rows(&range),
    })
}

/// Rebuild the absolute grid: calamine's used range starts at the first
/// occupied cell, but header indices are defined against the on-sheet row
/// numbers, so leading blank rows and columns are padded back in.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let top = usize::try_from(start_row).unwrap_or(0);
    let left = usize::try_from(start_col).unwrap_or(0);

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![Cell::Missing; left];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }
    rows
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            if text.trim().is_empty() {
                Cell::Missing
            } else {
                Cell::Text(text.clone())
            }
        }
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map_or(Cell::Missing, |datetime| Cell::Text(format_datetime(datetime))),
    }
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
