#![allow(dead_code)]

use sheet_bridge::engine::memory::MemoryEngine;
use sheet_bridge::model::{CellValue, CommandResult};
use sheet_bridge::ops;
use sheet_bridge::resolve::SheetTarget;
use sheet_bridge::{InvocationContext, run};

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn number(value: f64) -> CellValue {
    CellValue::Number(value)
}

pub fn set_cell(workbook: &MemoryEngine, sheet: Option<&str>, address: &str, value: CellValue) {
    ops::set_cell_value(workbook, address, &value, &SheetTarget::from_context(sheet))
        .expect("set cell");
}

pub fn cell_value(workbook: &MemoryEngine, sheet: Option<&str>, address: &str) -> CellValue {
    ops::get_cell_value(workbook, address, &SheetTarget::from_context(sheet)).expect("get cell")
}

/// Run one request through the entry point and unwrap the single envelope.
pub fn invoke(workbook: &MemoryEngine, argv: serde_json::Value) -> CommandResult {
    invoke_on_sheet(workbook, argv, None)
}

pub fn invoke_on_sheet(
    workbook: &MemoryEngine,
    argv: serde_json::Value,
    active_sheet: Option<&str>,
) -> CommandResult {
    let context = InvocationContext {
        argv,
        active_sheet: active_sheet.map(str::to_string),
    };
    let mut results = run(workbook, &context);
    assert_eq!(results.len(), 1, "entry point returns a single envelope");
    results.remove(0)
}
