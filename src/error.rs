use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("failed to encode workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("workbook contains no worksheets")]
    NoWorksheets,

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no source produced output; every file failed or none were supplied")]
    EmptyBatch,
}
