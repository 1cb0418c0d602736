use crate::error::CleanError;
use crate::fill::forward_fill;
use crate::model::{Cell, DataTable};

const RECEIPT_DATE: &str = "วันที่รับชำระ";
const RECEIPT_NUMBER: &str = "เลขที่ใบเสร็จ";
const INVOICE_DATE: &str = "วันที่";
const CUSTOMER_NAME: &str = "ชื่อลูกค้า";
const SALESPERSON: &str = "พนักงานขาย";
const DEPOSIT_AMOUNT: &str = "ตัดเงินมัดจำ";
const INVOICE_TOTAL: &str = "ยอดตามใบกำกับ";
const RECEIPT_TOTAL: &str = "จำนวนเงินรวมตามใบเสร็จ";

/// Legacy label of the derived salesperson-on-receipt column; downstream
/// sheets key on it, so it is published unchanged.
const DERIVED_SALESPERSON: &str = "new_col";

/// Receipt rows carry this marker in their document number.
const RECEIPT_MARKER: &str = "RE";
/// Only salespeople on the in-house team (code containing `I`) are reported.
const TEAM_MARKER: &str = "I";

/// Receipt-level fields carried down onto their allocation rows.
const FILL_COLUMNS: [&str; 6] = [
    RECEIPT_DATE,
    RECEIPT_NUMBER,
    INVOICE_DATE,
    CUSTOMER_NAME,
    DERIVED_SALESPERSON,
    RECEIPT_TOTAL,
];

const PUBLISHED_COLUMNS: [&str; 9] = [
    RECEIPT_DATE,
    RECEIPT_NUMBER,
    INVOICE_DATE,
    CUSTOMER_NAME,
    SALESPERSON,
    DERIVED_SALESPERSON,
    DEPOSIT_AMOUNT,
    INVOICE_TOTAL,
    RECEIPT_TOTAL,
];

/// Set a derived column to the source column's value on masked rows and
/// missing elsewhere, overwriting an existing column of the same label.
fn set_derived_column(table: &mut DataTable, label: &str, mask: &[bool], source: usize) {
    if let Some(target) = table.column_index(label) {
        for (row, masked) in table.rows.iter_mut().zip(mask) {
            row[target] = if *masked { row[source].clone() } else { Cell::Missing };
        }
    } else {
        table.columns.push(label.to_string());
        for (row, masked) in table.rows.iter_mut().zip(mask) {
            let value = if *masked { row[source].clone() } else { Cell::Missing };
            row.push(value);
        }
    }
}

/// Reshape a normalized payment-receipt sheet into one record per deposit
/// allocation attributable to the in-house sales team.
pub(crate) fn reshape_payment(mut table: DataTable) -> Result<DataTable, CleanError> {
    let receipt_number = table.require_column(RECEIPT_NUMBER)?;
    let salesperson = table.require_column(SALESPERSON)?;
    let deposit = table.require_column(DEPOSIT_AMOUNT)?;
    let invoice_total = table.require_column(INVOICE_TOTAL)?;

    let receipt_mask = table
        .rows
        .iter()
        .map(|row| row[receipt_number].display().contains(RECEIPT_MARKER))
        .collect::<Vec<_>>();

    set_derived_column(&mut table, DERIVED_SALESPERSON, &receipt_mask, salesperson);
    set_derived_column(&mut table, RECEIPT_TOTAL, &receipt_mask, invoice_total);

    let mut table = forward_fill(table, &FILL_COLUMNS);

    table.rows.retain(|row| !row[deposit].is_missing());
    table
        .rows
        .retain(|row| row[salesperson].display().contains(TEAM_MARKER));

    Ok(table.select(&PUBLISHED_COLUMNS))
}
