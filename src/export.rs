use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;

use crate::error::CleanError;
use crate::model::{Cell, CombinedOutput};

/// Byte-order mark prefixed to CSV payloads so spreadsheet applications
/// decode Thai text as UTF-8 instead of the platform legacy codepage.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Serialize a combined table to delimited text bytes (UTF-8 with BOM).
pub fn to_csv_bytes(combined: &CombinedOutput, delimiter: u8) -> Result<Vec<u8>, CleanError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(&combined.headers)?;
    for row in &combined.rows {
        writer.write_record(row.iter().map(Cell::display))?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|error| CleanError::Csv(error.into_error().into()))
}

/// Serialize a combined table to a single-sheet workbook byte payload.
pub fn to_xlsx_bytes(combined: &CombinedOutput, sheet_name: &str) -> Result<Vec<u8>, CleanError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let mut column: u16 = 0;
    for header in &combined.headers {
        worksheet.write_string(0, column, header)?;
        column = column.saturating_add(1);
    }

    let mut excel_row: u32 = 1;
    for row in &combined.rows {
        let mut column: u16 = 0;
        for cell in row {
            match cell {
                Cell::Missing => {}
                Cell::Text(text) => {
                    worksheet.write_string(excel_row, column, text)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(excel_row, column, *value)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(excel_row, column, *value)?;
                }
            }
            column = column.saturating_add(1);
        }
        excel_row = excel_row.saturating_add(1);
    }

    Ok(workbook.save_to_buffer()?)
}
