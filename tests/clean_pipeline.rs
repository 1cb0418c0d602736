mod common;

use std::process::Command;

use common::Fx;
use sales_bill_to_csv::{
    Cell, CleanOptions, Pipeline, WarningCode, clean_files, to_csv_bytes,
};
use tempfile::tempdir;

#[test]
fn cleans_sales_batch_in_upload_order_with_provenance() {
    let dir = tempdir().expect("tempdir should be created");
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");

    common::create_test_workbook(&first, &common::sales_rows())
        .expect("fixture should be created");
    common::create_test_workbook(&second, &common::sales_rows())
        .expect("fixture should be created");

    let (combined, report) = clean_files(
        &[first, second],
        &CleanOptions::default(),
    )
    .expect("cleaning should succeed");

    // Three line items per file (two products + the deposit offset).
    assert_eq!(combined.row_count, 6);
    assert_eq!(report.source_count, 2);
    assert!(report.failures.is_empty());

    // Header disclosed per file.
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].file, "a.xlsx");
    assert_eq!(report.files[0].header_row, 3);
    assert_eq!(report.files[0].row_count, 3);

    let source = combined
        .headers
        .iter()
        .position(|header| header == "__source_file__")
        .expect("provenance column");
    assert_eq!(combined.rows[0][source], Cell::Text("a.xlsx".to_string()));
    assert_eq!(combined.rows[3][source], Cell::Text("b.xlsx".to_string()));

    let item_code = combined
        .headers
        .iter()
        .position(|header| header == "เลขที่สินค้า")
        .expect("item code column");
    assert_eq!(combined.rows[0][item_code], Cell::Text("P-1001".to_string()));
    assert_eq!(
        combined.rows[2][item_code],
        Cell::Text("ตัดใบรับมัดจำ#".to_string())
    );

    let order = combined
        .headers
        .iter()
        .position(|header| header == "เลขที่ใบสั่งขาย")
        .expect("derived order column");
    assert_eq!(combined.rows[0][order], Cell::Text("SO123".to_string()));
}

#[test]
fn csv_export_round_trips_the_combined_table() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("sales.xlsx");
    common::create_test_workbook(&input, &common::sales_rows())
        .expect("fixture should be created");

    let (combined, _) =
        clean_files(&[input], &CleanOptions::default()).expect("cleaning should succeed");
    let bytes = to_csv_bytes(&combined, b',').expect("csv should encode");

    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

    let mut reader = csv::ReaderBuilder::new().from_reader(&bytes[3..]);
    let headers = reader.headers().expect("headers should parse").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        combined.headers.iter().map(String::as_str).collect::<Vec<_>>()
    );

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("records should parse");
    assert_eq!(records.len(), combined.row_count);

    for (record, row) in records.iter().zip(&combined.rows) {
        for (field, cell) in record.iter().zip(row) {
            assert_eq!(field, cell.display());
        }
    }
}

#[test]
fn failed_file_is_reported_and_others_survive() {
    let dir = tempdir().expect("tempdir should be created");
    let first = dir.path().join("a.xlsx");
    let second = dir.path().join("b.xlsx");
    let third = dir.path().join("c.xlsx");

    // The middle file lacks the sales-order column entirely.
    let mut broken = common::sales_rows();
    for row in &mut broken {
        if row.len() > 9 {
            row[9] = Fx::E;
        }
    }
    if let Some(header) = broken.get_mut(3) {
        header[9] = Fx::S("หมายเหตุ");
    }

    common::create_test_workbook(&first, &common::sales_rows())
        .expect("fixture should be created");
    common::create_test_workbook(&second, &broken).expect("fixture should be created");
    common::create_test_workbook(&third, &common::sales_rows())
        .expect("fixture should be created");

    let (combined, report) = clean_files(
        &[first, second, third],
        &CleanOptions::default(),
    )
    .expect("cleaning should succeed");

    assert_eq!(combined.source_count, 2);
    assert_eq!(combined.row_count, 6);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "b.xlsx");
    assert!(
        report.failures[0].message.contains("ใบสั่งขาย"),
        "unexpected message: {}",
        report.failures[0].message
    );

    let source = combined
        .headers
        .iter()
        .position(|header| header == "__source_file__")
        .expect("provenance column");
    for row in &combined.rows {
        assert_ne!(row[source], Cell::Text("b.xlsx".to_string()));
    }
}

#[test]
fn payment_pipeline_reads_under_its_fixed_skip() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("receipts.xlsx");
    common::create_test_workbook(&input, &common::payment_rows())
        .expect("fixture should be created");

    let options = CleanOptions {
        pipeline: Pipeline::Payment,
        ..CleanOptions::default()
    };
    let (combined, report) =
        clean_files(&[input], &options).expect("cleaning should succeed");

    assert_eq!(report.files[0].header_row, 4);
    // Only the in-house allocation survives: the receipt row has no deposit,
    // the external salesperson lacks the team marker.
    assert_eq!(combined.row_count, 1);

    let field = |label: &str| {
        combined
            .headers
            .iter()
            .position(|header| header == label)
            .unwrap_or_else(|| panic!("missing column {label}"))
    };

    let row = &combined.rows[0];
    assert_eq!(row[field("เลขที่ใบเสร็จ")], Cell::Text("RE6800001".to_string()));
    assert_eq!(row[field("new_col")], Cell::Text("I02".to_string()));
    assert_eq!(row[field("ตัดเงินมัดจำ")], Cell::Number(100.0));
    assert_eq!(
        row[field("จำนวนเงินรวมตามใบเสร็จ")],
        Cell::Number(1070.0)
    );
}

#[test]
fn unrecognized_header_block_falls_back_to_row_five() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("legacy.xlsx");

    // Header vocabulary that never satisfies the detector, placed exactly at
    // the fallback row, with the placeholder columns the reshaper needs.
    let mut rows = vec![
        vec![Fx::S("เอกสารภายใน")],
        vec![],
        vec![],
        vec![],
        vec![],
    ];
    rows.push(vec![
        Fx::S("A"),
        Fx::E,
        Fx::S("B"),
        Fx::S("C"),
        Fx::S("D"),
        Fx::S("E"),
        Fx::E,
        Fx::E,
        Fx::S("V"),
        Fx::S("ใบสั่งขาย"),
        Fx::S("ส่วนลด"),
        Fx::S("มูลค่าสินค้า"),
        Fx::S("รวมทั้งสิ้น"),
    ]);
    rows.push(vec![
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::S("สินค้า"),
    ]);
    rows.push(vec![
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::E,
        Fx::S("P-1001"),
        Fx::S("สินค้า เอ"),
        Fx::S("1"),
        Fx::S("SO9"),
        Fx::E,
        Fx::N(10.0),
        Fx::N(10.7),
    ]);

    common::create_test_workbook(&input, &rows).expect("fixture should be created");

    let (combined, report) =
        clean_files(&[input], &CleanOptions::default()).expect("cleaning should succeed");

    assert_eq!(report.files[0].header_row, 5);
    assert_eq!(combined.row_count, 1);
    assert!(
        report
            .warnings
            .iter()
            .any(|warning| warning.code == WarningCode::HeaderFallback)
    );
}

#[test]
fn cli_exits_with_code_2_when_no_rows_survive() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("empty.xlsx");
    let output = dir.path().join("empty.csv");

    // Header plus the residual remnant only: everything is filtered away.
    let rows = vec![
        vec![Fx::S("บริษัท ตัวอย่าง จำกัด")],
        vec![],
        vec![],
        vec![
            Fx::S("วันที่"),
            Fx::E,
            Fx::S("เลขที่"),
            Fx::S("ลูกค้า"),
            Fx::S("พนักงานขาย"),
            Fx::S("เก็บเงิน"),
            Fx::E,
            Fx::E,
            Fx::S("V"),
            Fx::S("ใบสั่งขาย"),
            Fx::S("ส่วนลด"),
            Fx::S("มูลค่าสินค้า"),
            Fx::S("รวมทั้งสิ้น"),
        ],
        vec![
            Fx::E,
            Fx::E,
            Fx::E,
            Fx::E,
            Fx::E,
            Fx::E,
            Fx::S("สินค้า"),
        ],
    ];
    common::create_test_workbook(&input, &rows).expect("fixture should be created");

    let status = Command::new(env!("CARGO_BIN_EXE_bill2csv"))
        .args([
            "clean",
            "-i",
            &input.to_string_lossy(),
            "--csv",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
}
