use crate::model::DataTable;

/// Carry the last observed value of each listed column downward.
///
/// Applied independently per column; a present value starts a new run and
/// there is no other grouping boundary. Labels not present in the table are
/// skipped, so callers can pass the full candidate set. Idempotent.
pub(crate) fn forward_fill(mut table: DataTable, labels: &[&str]) -> DataTable {
    for label in labels {
        let Some(column) = table.column_index(label) else {
            continue;
        };

        let mut last_seen = None;
        for row in &mut table.rows {
            let Some(cell) = row.get_mut(column) else {
                continue;
            };
            if cell.is_missing() {
                if let Some(value) = &last_seen {
                    cell.clone_from(value);
                }
            } else {
                last_seen = Some(cell.clone());
            }
        }
    }

    table
}
