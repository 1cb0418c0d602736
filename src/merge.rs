use crate::model::{Cell, CombinedOutput, DataTable};

/// Provenance column appended to every combined row.
pub(crate) const SOURCE_COLUMN: &str = "__source_file__";

/// Concatenate reshaped tables in upload order under their schema union.
///
/// Columns keep first-seen order across sources; rows from narrower tables
/// get an explicit missing value for columns they never had. Every row is
/// tagged with the name of the file it came from.
pub(crate) fn combine_sources(tables: &[(String, DataTable)]) -> CombinedOutput {
    let mut headers: Vec<String> = Vec::new();
    for (_, table) in tables {
        for column in &table.columns {
            if !headers.contains(column) {
                headers.push(column.clone());
            }
        }
    }

    let mut rows = Vec::new();
    for (source, table) in tables {
        let indices = headers
            .iter()
            .map(|header| table.column_index(header))
            .collect::<Vec<_>>();

        for table_row in &table.rows {
            let mut row = indices
                .iter()
                .map(|index| {
                    index
                        .and_then(|column| table_row.get(column).cloned())
                        .unwrap_or(Cell::Missing)
                })
                .collect::<Vec<_>>();
            row.push(Cell::Text(source.clone()));
            rows.push(row);
        }
    }

    headers.push(SOURCE_COLUMN.to_string());

    CombinedOutput {
        headers,
        row_count: rows.len(),
        source_count: tables.len(),
        rows,
    }
}
