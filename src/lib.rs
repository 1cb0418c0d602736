mod error;
mod export;
mod fill;
mod header_locate;
mod merge;
mod model;
mod normalize;
mod options;
mod payment;
mod sales;
mod sheet_reader;
mod warning;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use error::CleanError;
pub use export::{to_csv_bytes, to_xlsx_bytes};
pub use model::{Cell, CombinedOutput, DataTable, RawSheet, SourceInput};
pub use options::{CleanOptions, HeaderSkip, Pipeline};
pub use warning::{CleanWarning, WarningCode};

/// Per-file outcome for sources that made it into the combined output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub file: String,
    pub header_row: usize,
    pub row_count: usize,
}

/// Per-file outcome for sources excluded from the combined output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub row_count: usize,
    pub source_count: usize,
    pub files: Vec<FileSummary>,
    pub failures: Vec<FileFailure>,
    pub warnings: Vec<CleanWarning>,
}

/// Clean a batch of in-memory workbooks into one combined table.
///
/// A file that cannot be read or reshaped is recorded in the report's
/// failures and skipped; the batch only fails as a whole when nothing
/// survives.
pub fn clean_workbooks(
    sources: &[SourceInput],
    options: &CleanOptions,
) -> Result<(CombinedOutput, CleanReport), CleanError> {
    clean_sources(sources, Vec::new(), options)
}

/// Clean a batch of workbook files from disk, in the given order.
pub fn clean_files(
    paths: &[PathBuf],
    options: &CleanOptions,
) -> Result<(CombinedOutput, CleanReport), CleanError> {
    let mut sources = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        let name = source_name(path);
        match fs::read(path) {
            Ok(bytes) => sources.push(SourceInput { name, bytes }),
            Err(error) => failures.push(FileFailure {
                file: name,
                message: error.to_string(),
            }),
        }
    }

    clean_sources(&sources, failures, options)
}

/// Clean a batch and encode the combined table as CSV bytes in one step.
pub fn clean_workbooks_to_csv(
    sources: &[SourceInput],
    options: &CleanOptions,
) -> Result<(Vec<u8>, CleanReport), CleanError> {
    let (combined, report) = clean_workbooks(sources, options)?;
    let csv = to_csv_bytes(&combined, options.delimiter)?;
    Ok((csv, report))
}

/// Clean a batch and encode the combined table as workbook bytes in one step.
pub fn clean_workbooks_to_xlsx(
    sources: &[SourceInput],
    options: &CleanOptions,
) -> Result<(Vec<u8>, CleanReport), CleanError> {
    let (combined, report) = clean_workbooks(sources, options)?;
    let xlsx = to_xlsx_bytes(&combined, options.effective_sheet_name())?;
    Ok((xlsx, report))
}

fn source_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn clean_sources(
    sources: &[SourceInput],
    mut failures: Vec<FileFailure>,
    options: &CleanOptions,
) -> Result<(CombinedOutput, CleanReport), CleanError> {
    if options.scan_window == 0 {
        return Err(CleanError::InvalidOption(
            "scan window must be at least 1".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    let mut files = Vec::new();
    let mut tables = Vec::new();

    for source in sources {
        match process_source(source, options, &mut warnings) {
            Ok((table, header_row)) => {
                files.push(FileSummary {
                    file: source.name.clone(),
                    header_row,
                    row_count: table.rows.len(),
                });
                tables.push((source.name.clone(), table));
            }
            Err(error) => {
                tracing::warn!(file = %source.name, %error, "source excluded from combined output");
                failures.push(FileFailure {
                    file: source.name.clone(),
                    message: error.to_string(),
                });
            }
        }
    }

    if tables.is_empty() {
        return Err(CleanError::EmptyBatch);
    }

    let combined = merge::combine_sources(&tables);
    tracing::info!(
        rows = combined.row_count,
        sources = combined.source_count,
        "bill cleanup completed"
    );

    let report = CleanReport {
        row_count: combined.row_count,
        source_count: combined.source_count,
        files,
        failures,
        warnings,
    };
    Ok((combined, report))
}

fn process_source(
    source: &SourceInput,
    options: &CleanOptions,
    warnings: &mut Vec<CleanWarning>,
) -> Result<(DataTable, usize), CleanError> {
    let header_row = match options.effective_header_skip() {
        HeaderSkip::Fixed(row) => row,
        HeaderSkip::Auto => {
            header_locate::scan_header_row(&source.bytes, &source.name, options, warnings)
        }
    };

    let sheet = sheet_reader::read_sheet_bytes(&source.bytes)?;
    let table = normalize::table_below_header(&sheet, header_row);
    let reshaped = match options.pipeline {
        Pipeline::Sales => sales::reshape_sales(table),
        Pipeline::Payment => payment::reshape_payment(table),
    }?;

    tracing::debug!(
        file = %source.name,
        header_row,
        rows = reshaped.rows.len(),
        "source reshaped"
    );
    Ok((reshaped, header_row))
}
