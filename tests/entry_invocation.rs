mod support;

use serde_json::json;
use sheet_bridge::engine::memory::MemoryEngine;
use sheet_bridge::{InvocationContext, run};
use support::{cell_value, invoke, invoke_on_sheet, number, text};

#[test]
fn items_matrix_writes_from_a1_and_reports_extent() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"items": [[1, 2], [3, 4]]}));

    assert!(res.success);
    assert_eq!(res.message.as_deref(), Some("data written"));
    assert_eq!(res.data["rowsWritten"], json!(2));
    assert_eq!(res.data["range"], json!("A1:B2"));

    assert_eq!(cell_value(&workbook, None, "A1"), number(1.0));
    assert_eq!(cell_value(&workbook, None, "B2"), number(4.0));
}

#[test]
fn items_matrix_accepts_mixed_scalars() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"items": [["label", null, true]]}));
    assert!(res.success);
    assert_eq!(res.data["range"], json!("A1:C1"));
    assert_eq!(cell_value(&workbook, None, "A1"), text("label"));
    assert!(cell_value(&workbook, None, "B1").is_empty());
}

#[test]
fn wide_matrix_extends_into_double_letter_columns() {
    let workbook = MemoryEngine::new();
    let row: Vec<serde_json::Value> = (1..=28).map(|n| json!(n)).collect();
    let res = invoke(&workbook, json!({"items": [row]}));
    assert_eq!(res.data["range"], json!("A1:AB1"));
    assert_eq!(cell_value(&workbook, None, "AB1"), number(28.0));
}

#[test]
fn empty_matrix_reports_empty_data_without_writing() {
    let workbook = MemoryEngine::new();

    let res = invoke(&workbook, json!({"items": []}));
    assert!(!res.success);
    assert_eq!(res.message.as_deref(), Some("empty data"));

    let res = invoke(&workbook, json!({"items": [[]]}));
    assert!(!res.success);
    assert_eq!(res.message.as_deref(), Some("empty data"));

    // Nothing was written either way.
    let res = invoke(&workbook, json!({"function": "getUsedRangeData"}));
    assert_eq!(res.data["data"], json!([]));
}

#[test]
fn non_array_items_falls_through_to_no_operation() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"items": "nope"}));
    assert!(!res.success);
    assert_eq!(res.message.as_deref(), Some("no operation specified"));
}

#[test]
fn missing_operation_is_reported() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({}));
    assert!(!res.success);
    assert_eq!(res.message.as_deref(), Some("no operation specified"));

    let context = InvocationContext::default();
    let results = run(&workbook, &context);
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
}

#[test]
fn items_write_targets_the_context_sheet() {
    let workbook = MemoryEngine::new();
    invoke(&workbook, json!({"function": "addWorksheet", "sheetName": "Data"}));

    let res = invoke_on_sheet(&workbook, json!({"items": [[7]]}), Some("Sheet1"));
    assert!(res.success);
    assert_eq!(cell_value(&workbook, Some("Sheet1"), "A1"), number(7.0));
    assert!(cell_value(&workbook, Some("Data"), "A1").is_empty());
}

#[test]
fn unresolvable_context_sheet_fails_in_envelope() {
    let workbook = MemoryEngine::new();

    let res = invoke_on_sheet(
        &workbook,
        json!({"function": "getCellValue", "address": "A1"}),
        Some("Ghost"),
    );
    assert!(!res.success);
    assert_eq!(res.error.as_deref(), Some("worksheet not found: Ghost"));

    let res = invoke_on_sheet(&workbook, json!({"items": [[1]]}), Some("Ghost"));
    assert!(!res.success);
    assert_eq!(res.error.as_deref(), Some("worksheet not found: Ghost"));
}
