use crate::model::{Cell, DataTable, RawSheet};

/// Stable name for a column whose header cell is blank. Later rules address
/// these columns by position-derived name, so the format never changes.
pub(crate) fn placeholder_label(index: usize) -> String {
    format!("column {index}")
}

/// Reinterpret a raw sheet under the given header row.
///
/// Header cells become column labels: textual labels are trimmed, blank
/// header cells become positional placeholders kept verbatim from then on.
/// Rows above and including the header are discarded; data rows are padded
/// to the widest row so every label has a slot.
pub(crate) fn table_below_header(sheet: &RawSheet, header_row: usize) -> DataTable {
    let Some(header) = sheet.rows.get(header_row) else {
        return DataTable::default();
    };

    let data_rows = &sheet.rows[header_row + 1..];
    let width = data_rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let columns = (0..width)
        .map(|index| match header.get(index) {
            Some(Cell::Missing) | None => placeholder_label(index),
            Some(cell) => {
                let label = cell.display().trim().to_string();
                if label.is_empty() {
                    placeholder_label(index)
                } else {
                    label
                }
            }
        })
        .collect::<Vec<_>>();

    let rows = data_rows
        .iter()
        .map(|row| {
            let mut cells = row.clone();
            cells.resize(width, Cell::Missing);
            cells
        })
        .collect::<Vec<_>>();

    DataTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{placeholder_label, table_below_header};
    use crate::model::{Cell, RawSheet};

    #[test]
    fn trims_labels_and_names_blank_headers_by_position() {
        let sheet = RawSheet {
            rows: vec![
                vec![Cell::Text("ใบกำกับภาษี".to_string())],
                vec![
                    Cell::Text(" วันที่ ".to_string()),
                    Cell::Missing,
                    Cell::Text("ลูกค้า".to_string()),
                ],
                vec![
                    Cell::Text("01/07".to_string()),
                    Cell::Text("x".to_string()),
                    Cell::Text("บริษัท ก".to_string()),
                ],
            ],
        };

        let table = table_below_header(&sheet, 1);
        assert_eq!(table.columns, vec!["วันที่", "column 1", "ลูกค้า"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn pads_ragged_rows_and_extends_short_headers() {
        let sheet = RawSheet {
            rows: vec![
                vec![Cell::Text("วันที่".to_string())],
                vec![
                    Cell::Text("a".to_string()),
                    Cell::Text("b".to_string()),
                    Cell::Text("c".to_string()),
                ],
                vec![Cell::Text("d".to_string())],
            ],
        };

        let table = table_below_header(&sheet, 0);
        assert_eq!(
            table.columns,
            vec!["วันที่".to_string(), placeholder_label(1), placeholder_label(2)]
        );
        assert_eq!(
            table.rows[1],
            vec![Cell::Text("d".to_string()), Cell::Missing, Cell::Missing]
        );
    }

    #[test]
    fn header_beyond_sheet_yields_empty_table() {
        let sheet = RawSheet { rows: Vec::new() };
        let table = table_below_header(&sheet, 5);
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }
}
