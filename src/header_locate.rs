use crate::model::RawSheet;
use crate::options::CleanOptions;
use crate::sheet_reader;
use crate::warning::{CleanWarning, WarningCode};

/// Row index used when no row in the scan window qualifies as a header.
pub(crate) const FALLBACK_HEADER_ROW: usize = 5;

/// Labels that must appear verbatim as cell values for a row to qualify.
const REQUIRED_LABELS: [&str; 3] = ["วันที่", "เลขที่", "ลูกค้า"];

/// Labels that raise the score when found as a substring of any cell.
const OPTIONAL_LABELS: [&str; 5] = [
    "พนักงานขาย",
    "เก็บเงิน",
    "ใบสั่งขาย",
    "วันครบกำหนด",
    "ส่วนลด",
];

const REQUIRED_WEIGHT: usize = 5;
const MIN_REQUIRED_MATCHES: usize = 2;

/// Locate the header row inside the leading block of title/metadata rows.
///
/// A row qualifies once at least two required labels appear verbatim among
/// its cells; among qualifying rows the highest score wins and ties keep the
/// lowest index. `None` means nothing in the window qualified and the caller
/// should use [`FALLBACK_HEADER_ROW`].
fn best_header_row(sheet: &RawSheet, window: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;

    for (index, row) in sheet.rows.iter().take(window).enumerate() {
        let cells = row
            .iter()
            .map(|cell| cell.display().trim().to_string())
            .collect::<Vec<_>>();

        let required = REQUIRED_LABELS
            .iter()
            .filter(|label| cells.iter().any(|cell| cell == *label))
            .count();
        if required < MIN_REQUIRED_MATCHES {
            continue;
        }

        let optional = OPTIONAL_LABELS
            .iter()
            .filter(|label| cells.iter().any(|cell| cell.contains(*label)))
            .count();
        let score = REQUIRED_WEIGHT * required + optional;

        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, index));
        }
    }

    best.map(|(_, index)| index)
}

/// Scan a source's leading rows for the header index.
///
/// The scan consumes the byte stream independently of the full read that
/// follows, so it re-opens the workbook from the start. An unreadable source
/// is a recoverable condition here: the scan falls back to row 0 with a
/// warning and leaves the hard failure to the full read.
pub(crate) fn scan_header_row(
    bytes: &[u8],
    file: &str,
    options: &CleanOptions,
    warnings: &mut Vec<CleanWarning>,
) -> usize {
    match sheet_reader::read_sheet_bytes(bytes) {
        Ok(sheet) => best_header_row(&sheet, options.scan_window).unwrap_or_else(|| {
            warnings.push(
                CleanWarning::new(
                    WarningCode::HeaderFallback,
                    "no row in the scan window matched the header vocabulary; using the fallback row",
                )
                .with_file(file)
                .with_header_row(FALLBACK_HEADER_ROW),
            );
            FALLBACK_HEADER_ROW
        }),
        Err(error) => {
            warnings.push(
                CleanWarning::new(
                    WarningCode::HeaderScanUnreadable,
                    format!("header scan could not open the workbook ({error}); assuming row 0"),
                )
                .with_file(file)
                .with_header_row(0),
            );
            0
        }
    }
}
