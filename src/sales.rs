use crate::error::CleanError;
use crate::fill::forward_fill;
use crate::model::{Cell, DataTable};
use crate::normalize::placeholder_label;

/// Column carrying the line sequence marker; deposit-offset rows put the
/// sentinel here instead of a sequence number.
const LINE_MARKER: &str = "V";
const SALES_ORDER: &str = "ใบสั่งขาย";
const DISCOUNT: &str = "ส่วนลด";
const PRODUCT_VALUE: &str = "มูลค่าสินค้า";
const GRAND_TOTAL: &str = "รวมทั้งสิ้น";

/// Sentinel text of a deposit-offset transaction row.
const DEPOSIT_SENTINEL: &str = "ตัดใบรับมัดจำ#";
/// Item-code cells containing this marker belong to invoice-level rows.
const INVOICE_MARKER: &str = "IN";

/// Working label of the derived sales-order column, renamed on publish.
const DERIVED_SALES_ORDER: &str = "new_col";

/// Item code sits in the unlabeled column at position 6, description at 7;
/// the unlabeled filler at position 1 is dropped from the output.
const ITEM_CODE_POSITION: usize = 6;
const DESCRIPTION_POSITION: usize = 7;
const DROPPED_POSITION: usize = 1;

/// Invoice-header fields written once per block and carried downward.
const FILL_COLUMNS: [&str; 7] = [
    "วันที่",
    "เลขที่",
    "ลูกค้า",
    "พนักงานขาย",
    "เก็บเงิน",
    DERIVED_SALES_ORDER,
    "วันครบกำหนด",
];

/// Derive the sales-order number for one row.
///
/// Invoice-level rows (item code containing the marker) get the sentinel
/// `-`. Otherwise the sales-order field is split at the first `-` and the
/// left part kept; a value without a delimiter is kept unchanged, and a
/// missing value stays missing so the block's forward fill supplies it.
fn derive_sales_order(item_code: &Cell, sales_order: &Cell) -> Cell {
    if item_code.display().contains(INVOICE_MARKER) {
        return Cell::Text("-".to_string());
    }

    if sales_order.is_missing() {
        return Cell::Missing;
    }

    let value = sales_order.display();
    let derived = value.split_once('-').map_or(value.as_str(), |(left, _)| left);
    Cell::Text(derived.to_string())
}

/// Reshape a normalized sales-invoice sheet into one record per line item.
pub(crate) fn reshape_sales(mut table: DataTable) -> Result<DataTable, CleanError> {
    let item_label = placeholder_label(ITEM_CODE_POSITION);
    let description_label = placeholder_label(DESCRIPTION_POSITION);

    let item_code = table.require_column(&item_label)?;
    let description = table.require_column(&description_label)?;
    let marker = table.require_column(LINE_MARKER)?;
    let sales_order = table.require_column(SALES_ORDER)?;
    let discount = table.require_column(DISCOUNT)?;
    let product_value = table.require_column(PRODUCT_VALUE)?;
    let grand_total = table.require_column(GRAND_TOTAL)?;

    table.columns.push(DERIVED_SALES_ORDER.to_string());
    for row in &mut table.rows {
        let derived = derive_sales_order(&row[item_code], &row[sales_order]);
        row.push(derived);
    }

    // Deposit adjustments become pseudo line items so they survive the
    // item-code filter together with ordinary rows.
    for row in &mut table.rows {
        if row[marker].as_text() == Some(DEPOSIT_SENTINEL) {
            row[item_code] = Cell::Text(DEPOSIT_SENTINEL.to_string());
            row[description] = row[discount].clone();
            row[grand_total] = row[product_value].clone();
        }
    }

    let mut table = forward_fill(table, &FILL_COLUMNS);

    table.rows.retain(|row| !row[item_code].is_missing());
    if !table.rows.is_empty() {
        // The first surviving row is a residual header remnant, not a line item.
        table.rows.remove(0);
    }

    table.rename_column(LINE_MARKER, "รายการที่");
    table.rename_column(&item_label, "เลขที่สินค้า");
    table.rename_column(&description_label, "รายละเอียด");
    table.rename_column(DERIVED_SALES_ORDER, "เลขที่ใบสั่งขาย");
    table.rename_column(PRODUCT_VALUE, "ราคาต่อหน่วย");
    table.drop_column(&placeholder_label(DROPPED_POSITION));

    Ok(table)
}
