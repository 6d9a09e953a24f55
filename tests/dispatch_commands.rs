mod support;

use serde_json::json;
use sheet_bridge::command_catalog;
use sheet_bridge::engine::memory::MemoryEngine;
use support::{cell_value, invoke, invoke_on_sheet, number, set_cell, text};

#[test]
fn set_and_get_cell_value() {
    let workbook = MemoryEngine::new();

    let res = invoke(
        &workbook,
        json!({"function": "setCellValue", "address": "A1", "value": 42}),
    );
    assert!(res.success);
    assert_eq!(res.message.as_deref(), Some("value set"));

    let res = invoke(&workbook, json!({"function": "getCellValue", "address": "A1"}));
    assert!(res.success);
    assert_eq!(res.data["value"], json!(42.0));

    // Unset cells read back as null.
    let res = invoke(&workbook, json!({"function": "getCellValue", "address": "Z9"}));
    assert!(res.success);
    assert_eq!(res.data["value"], json!(null));
}

#[test]
fn range_values_round_trip() {
    let workbook = MemoryEngine::new();

    let res = invoke(
        &workbook,
        json!({
            "function": "setRangeValues",
            "address": "A1:B2",
            "values": [[1, "x"], [true, null]],
        }),
    );
    assert!(res.success);
    assert_eq!(res.message.as_deref(), Some("values set"));

    let res = invoke(
        &workbook,
        json!({"function": "getRangeValues", "address": "A1:B2"}),
    );
    assert_eq!(res.data["values"], json!([[1.0, "x"], [true, null]]));
}

#[test]
fn formula_commands() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", number(5.0));

    // A plain value cell reports its display text as its formula.
    let res = invoke(
        &workbook,
        json!({"function": "getCellFormula", "address": "A1"}),
    );
    assert_eq!(res.data["formula"], json!("5"));

    let res = invoke(
        &workbook,
        json!({"function": "setCellFormula", "address": "B1", "formula": "=SUM(A1:A9)"}),
    );
    assert_eq!(res.message.as_deref(), Some("formula set"));

    let res = invoke(
        &workbook,
        json!({"function": "getCellFormula", "address": "B1"}),
    );
    assert_eq!(res.data["formula"], json!("=SUM(A1:A9)"));
}

#[test]
fn formatting_commands_acknowledge() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", text("title"));

    let res = invoke(
        &workbook,
        json!({
            "function": "setCellFont",
            "address": "A1",
            "fontOptions": {"name": "Arial", "size": 14, "bold": true},
        }),
    );
    assert!(res.success);
    assert_eq!(res.message.as_deref(), Some("font applied"));

    let res = invoke(
        &workbook,
        json!({"function": "setCellBackgroundColor", "address": "A1", "color": 65_280}),
    );
    assert_eq!(res.message.as_deref(), Some("background color applied"));

    let res = invoke(
        &workbook,
        json!({
            "function": "setCellAlignment",
            "address": "A1",
            "alignOptions": {"horizontal": -4108, "vertical": -4160},
        }),
    );
    assert_eq!(res.message.as_deref(), Some("alignment applied"));

    let res = invoke(
        &workbook,
        json!({
            "function": "setCellBorder",
            "address": "A1",
            "borderOptions": {"lineStyle": 1, "weight": 2, "color": 0},
        }),
    );
    assert_eq!(res.message.as_deref(), Some("border applied"));

    let res = invoke(
        &workbook,
        json!({"function": "setCellNumberFormat", "address": "A1", "format": "0.00"}),
    );
    assert_eq!(res.message.as_deref(), Some("number format set"));
}

#[test]
fn merge_and_autofit_commands_acknowledge() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", text("wide header"));

    let res = invoke(&workbook, json!({"function": "mergeCells", "address": "A1:C1"}));
    assert_eq!(res.message.as_deref(), Some("cells merged"));

    let res = invoke(
        &workbook,
        json!({"function": "unmergeCells", "address": "A1:C1"}),
    );
    assert_eq!(res.message.as_deref(), Some("cells unmerged"));

    let res = invoke(&workbook, json!({"function": "autoFitColumns", "address": "A:A"}));
    assert_eq!(res.message.as_deref(), Some("columns autofitted"));
}

#[test]
fn row_insertion_shifts_cells_down() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", number(1.0));
    set_cell(&workbook, None, "A2", number(2.0));

    let res = invoke(
        &workbook,
        json!({"function": "insertRows", "rowIndex": 2, "count": 2}),
    );
    assert_eq!(res.message.as_deref(), Some("rows inserted"));

    assert_eq!(cell_value(&workbook, None, "A1"), number(1.0));
    assert!(cell_value(&workbook, None, "A2").is_empty());
    assert!(cell_value(&workbook, None, "A3").is_empty());
    assert_eq!(cell_value(&workbook, None, "A4"), number(2.0));
}

#[test]
fn row_deletion_shifts_cells_up() {
    let workbook = MemoryEngine::new();
    for (row, value) in [(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)] {
        set_cell(&workbook, None, &format!("A{row}"), number(value));
    }

    let res = invoke(
        &workbook,
        json!({"function": "deleteRows", "rowIndex": 2, "count": 2}),
    );
    assert_eq!(res.message.as_deref(), Some("rows deleted"));

    assert_eq!(cell_value(&workbook, None, "A1"), number(1.0));
    assert_eq!(cell_value(&workbook, None, "A2"), number(4.0));
    assert!(cell_value(&workbook, None, "A3").is_empty());
}

#[test]
fn column_insertion_and_deletion_shift_cells() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", number(1.0));
    set_cell(&workbook, None, "B1", number(2.0));
    set_cell(&workbook, None, "C1", number(3.0));

    // Count defaults to 1 when omitted.
    let res = invoke(
        &workbook,
        json!({"function": "insertColumns", "columnIndex": 2}),
    );
    assert_eq!(res.message.as_deref(), Some("columns inserted"));
    assert!(cell_value(&workbook, None, "B1").is_empty());
    assert_eq!(cell_value(&workbook, None, "C1"), number(2.0));
    assert_eq!(cell_value(&workbook, None, "D1"), number(3.0));

    let res = invoke(
        &workbook,
        json!({"function": "deleteColumns", "columnIndex": 1, "count": 2}),
    );
    assert_eq!(res.message.as_deref(), Some("columns deleted"));
    assert_eq!(cell_value(&workbook, None, "A1"), number(2.0));
    assert_eq!(cell_value(&workbook, None, "B1"), number(3.0));
}

#[test]
fn row_height_and_column_width_commands_acknowledge() {
    let workbook = MemoryEngine::new();

    let res = invoke(
        &workbook,
        json!({"function": "setRowHeight", "rowIndex": 3, "height": 24.5}),
    );
    assert_eq!(res.message.as_deref(), Some("row height set"));

    let res = invoke(
        &workbook,
        json!({"function": "setColumnWidth", "columnIndex": 2, "width": 18.0}),
    );
    assert_eq!(res.message.as_deref(), Some("column width set"));
}

#[test]
fn find_commands_report_matches() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", text("Apple"));
    set_cell(&workbook, None, "B2", text("Apple Pie"));
    set_cell(&workbook, None, "C3", text("Banana"));

    let res = invoke(
        &workbook,
        json!({"function": "findCell", "searchText": "Apple", "searchRange": "A1:C3"}),
    );
    assert!(res.success);
    assert_eq!(res.data["found"], json!(true));
    assert_eq!(res.data["cells"][0]["address"], json!("A1"));
    assert_eq!(res.data["cells"][1]["address"], json!("B2"));
    assert_eq!(res.data["cells"][1]["row"], json!(2));
    assert_eq!(res.data["cells"][1]["column"], json!(2));

    let res = invoke(
        &workbook,
        json!({"function": "findAllCells", "searchText": "Apple", "searchRange": "A1:C3"}),
    );
    assert_eq!(res.data["count"], json!(2));

    let res = invoke(
        &workbook,
        json!({"function": "findCell", "searchText": "Durian", "searchRange": "A1:C3"}),
    );
    assert!(res.success);
    assert_eq!(res.data["found"], json!(false));
    assert_eq!(res.data["cells"], json!([]));
}

#[test]
fn replace_command_reports_count() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", text("old name"));
    set_cell(&workbook, None, "B1", text("old value"));

    let res = invoke(
        &workbook,
        json!({
            "function": "replaceInRangeWithCount",
            "searchText": "old",
            "replaceText": "new",
            "searchRange": "A1:B1",
        }),
    );
    assert!(res.success);
    assert_eq!(res.data["count"], json!(2));
    assert_eq!(cell_value(&workbook, None, "A1"), text("new name"));
    assert_eq!(cell_value(&workbook, None, "B1"), text("new value"));
}

#[test]
fn sort_range_orders_rows_by_key_column() {
    let workbook = MemoryEngine::new();
    for (row, key, label) in [(1, 3.0, "c"), (2, 1.0, "a"), (3, 2.0, "b")] {
        set_cell(&workbook, None, &format!("A{row}"), number(key));
        set_cell(&workbook, None, &format!("B{row}"), text(label));
    }

    let res = invoke(
        &workbook,
        json!({
            "function": "sortRange",
            "address": "A1:B3",
            "sortOptions": {"key": "A1"},
        }),
    );
    assert_eq!(res.message.as_deref(), Some("range sorted"));
    assert_eq!(cell_value(&workbook, None, "A1"), number(1.0));
    assert_eq!(cell_value(&workbook, None, "B1"), text("a"));
    assert_eq!(cell_value(&workbook, None, "A3"), number(3.0));
    assert_eq!(cell_value(&workbook, None, "B3"), text("c"));

    let res = invoke(
        &workbook,
        json!({
            "function": "sortRange",
            "address": "A1:B3",
            "sortOptions": {"key": "A1", "order": 2},
        }),
    );
    assert!(res.success);
    assert_eq!(cell_value(&workbook, None, "A1"), number(3.0));
    assert_eq!(cell_value(&workbook, None, "B1"), text("c"));
}

#[test]
fn sort_range_keeps_header_row_in_place() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", text("amount"));
    set_cell(&workbook, None, "A2", number(9.0));
    set_cell(&workbook, None, "A3", number(4.0));

    let res = invoke(
        &workbook,
        json!({
            "function": "sortRange",
            "address": "A1:A3",
            "sortOptions": {"key": "A1", "hasHeader": true},
        }),
    );
    assert!(res.success);
    assert_eq!(cell_value(&workbook, None, "A1"), text("amount"));
    assert_eq!(cell_value(&workbook, None, "A2"), number(4.0));
    assert_eq!(cell_value(&workbook, None, "A3"), number(9.0));
}

#[test]
fn copy_paste_commands_move_cell_blocks() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", number(1.0));
    set_cell(&workbook, None, "B1", number(2.0));

    let res = invoke(
        &workbook,
        json!({
            "function": "copyPasteRange",
            "sourceAddress": "A1:B1",
            "targetAddress": "A3",
        }),
    );
    assert_eq!(res.message.as_deref(), Some("range copied and pasted"));
    assert_eq!(cell_value(&workbook, None, "A3"), number(1.0));
    assert_eq!(cell_value(&workbook, None, "B3"), number(2.0));

    let res = invoke(
        &workbook,
        json!({"function": "copyRange", "sourceAddress": "A1:B1"}),
    );
    assert_eq!(res.message.as_deref(), Some("range copied"));

    let res = invoke(
        &workbook,
        json!({"function": "pasteToRange", "targetAddress": "D5"}),
    );
    assert_eq!(res.message.as_deref(), Some("range pasted"));
    assert_eq!(cell_value(&workbook, None, "D5"), number(1.0));
    assert_eq!(cell_value(&workbook, None, "E5"), number(2.0));
}

#[test]
fn paste_with_empty_clipboard_fails_in_envelope() {
    let workbook = MemoryEngine::new();
    let res = invoke(
        &workbook,
        json!({"function": "pasteToRange", "targetAddress": "A1"}),
    );
    assert!(!res.success);
    assert!(res.error.as_deref().unwrap().contains("clipboard is empty"));
}

#[test]
fn clear_commands_remove_values() {
    let workbook = MemoryEngine::new();
    set_cell(&workbook, None, "A1", number(1.0));
    set_cell(&workbook, None, "B1", number(2.0));

    let res = invoke(&workbook, json!({"function": "clearRange", "address": "A1"}));
    assert_eq!(res.message.as_deref(), Some("range cleared"));
    assert!(cell_value(&workbook, None, "A1").is_empty());

    let res = invoke(
        &workbook,
        json!({"function": "clearRangeContents", "address": "B1"}),
    );
    assert_eq!(res.message.as_deref(), Some("contents cleared"));
    assert!(cell_value(&workbook, None, "B1").is_empty());
}

#[test]
fn used_range_data_spans_the_occupied_rectangle() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"function": "getUsedRangeData"}));
    assert!(res.success);
    assert_eq!(res.data["data"], json!([]));

    set_cell(&workbook, None, "B2", number(5.0));
    set_cell(&workbook, None, "C4", text("x"));
    let res = invoke(&workbook, json!({"function": "getUsedRangeData"}));
    assert_eq!(
        res.data["data"],
        json!([[5.0, null], [null, null], [null, "x"]])
    );
}

#[test]
fn worksheet_lifecycle_commands() {
    let workbook = MemoryEngine::new();

    let res = invoke(&workbook, json!({"function": "getWorksheetCount"}));
    assert_eq!(res.data["count"], json!(1));

    let res = invoke(&workbook, json!({"function": "addWorksheet"}));
    assert!(res.success);
    assert_eq!(res.message.as_deref(), Some("worksheet added"));
    assert_eq!(res.data["sheetName"], json!("Sheet2"));

    let res = invoke(
        &workbook,
        json!({"function": "addWorksheet", "sheetName": "Data"}),
    );
    assert_eq!(res.data["sheetName"], json!("Data"));

    let res = invoke(
        &workbook,
        json!({"function": "addWorksheet", "sheetName": "Data"}),
    );
    assert!(!res.success);
    assert!(res.error.as_deref().unwrap().contains("already exists"));

    let res = invoke(&workbook, json!({"function": "getWorkbookName"}));
    assert_eq!(res.data["sheets"], json!(["Sheet1", "Sheet2", "Data"]));

    let res = invoke(
        &workbook,
        json!({"function": "worksheetExists", "sheetName": "Dat"}),
    );
    assert_eq!(res.data["exists"], json!(true));
    let res = invoke(
        &workbook,
        json!({"function": "worksheetExists", "sheetName": "Ledger"}),
    );
    assert_eq!(res.data["exists"], json!(false));

    // Delete by name, then by 1-based index.
    let res = invoke(
        &workbook,
        json!({"function": "deleteWorksheet", "sheetIdentifier": "Sheet2"}),
    );
    assert_eq!(res.message.as_deref(), Some("worksheet deleted"));

    let res = invoke(
        &workbook,
        json!({"function": "deleteWorksheet", "sheetIdentifier": 1}),
    );
    assert!(res.success);

    let res = invoke(&workbook, json!({"function": "getWorkbookName"}));
    assert_eq!(res.data["sheets"], json!(["Data"]));

    let res = invoke(
        &workbook,
        json!({"function": "deleteWorksheet", "sheetIdentifier": "Data"}),
    );
    assert!(!res.success);
    assert!(res.error.as_deref().unwrap().contains("last worksheet"));

    let res = invoke(
        &workbook,
        json!({"function": "deleteWorksheet", "sheetIdentifier": "Ghost"}),
    );
    assert_eq!(res.error.as_deref(), Some("worksheet not found: Ghost"));
}

#[test]
fn unknown_function_is_reported_not_thrown() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"function": "nonexistentFn"}));
    assert!(!res.success);
    assert_eq!(
        res.message.as_deref(),
        Some("unknown function: nonexistentFn")
    );
    assert!(res.error.is_none());
}

#[test]
fn malformed_address_fails_in_envelope() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"function": "getCellValue", "address": "???"}));
    assert!(!res.success);
    assert_eq!(res.error.as_deref(), Some("invalid range address: ???"));
}

#[test]
fn missing_parameters_fail_in_envelope() {
    let workbook = MemoryEngine::new();
    let res = invoke(&workbook, json!({"function": "setCellValue", "address": "A1"}));
    assert!(!res.success);
    assert!(
        res.error
            .as_deref()
            .unwrap()
            .contains("invalid parameters for setCellValue")
    );
}

#[test]
fn sheet_context_routes_commands_to_the_named_sheet() {
    let workbook = MemoryEngine::new();
    invoke(&workbook, json!({"function": "addWorksheet", "sheetName": "Data"}));

    let res = invoke_on_sheet(
        &workbook,
        json!({"function": "setCellValue", "address": "A1", "value": "routed"}),
        Some("Sheet1"),
    );
    assert!(res.success);

    assert_eq!(cell_value(&workbook, None, "A1"), sheet_bridge::model::CellValue::Empty);
    assert_eq!(cell_value(&workbook, Some("Sheet1"), "A1"), text("routed"));

    // Fuzzy context: a prefix of the sheet name still routes there.
    let res = invoke_on_sheet(
        &workbook,
        json!({"function": "getCellValue", "address": "A1"}),
        Some("Sheet"),
    );
    assert_eq!(res.data["value"], json!("routed"));
}

#[test]
fn command_catalog_covers_the_closed_set() {
    let catalog = command_catalog();
    assert_eq!(catalog.len(), 35);
    let names: Vec<&str> = catalog.iter().map(|(name, _)| name.as_str()).collect();
    assert!(names.contains(&"getCellValue"));
    assert!(names.contains(&"replaceInRangeWithCount"));
    assert!(names.contains(&"getWorkbookName"));
    // Wire names are camelCase.
    assert!(names.iter().all(|name| !name.contains('_')));
}
