//! Invocation entry point.
//!
//! An inbound request carries a parameter bag (`argv`) and an optional active
//! sheet name. A rectangular `items` matrix selects the bulk-write path, a
//! `function` name goes to the dispatcher, and anything else reports that no
//! operation was specified. Every failure, including ones raised before a
//! command is even identified, is folded into the result list.

use crate::dispatch::dispatch;
use crate::engine::Workbook;
use crate::error::BridgeError;
use crate::model::{CellValue, CommandResult};
use crate::ops;
use crate::resolve::SheetTarget;
use crate::utils::column_number_to_letter;
use schemars::JsonSchema;
use serde::Deserialize;

/// The context object a remote invocation delivers.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct InvocationContext {
    #[serde(default)]
    pub argv: serde_json::Value,
    #[serde(default)]
    pub active_sheet: Option<String>,
}

/// Handle one invocation. Never panics or propagates: the returned list is
/// always well formed, with failures expressed as envelopes.
pub fn run(workbook: &dyn Workbook, context: &InvocationContext) -> Vec<CommandResult> {
    let argv = &context.argv;
    let sheet = context.active_sheet.as_deref();

    if let Some(items) = argv.get("items").and_then(serde_json::Value::as_array) {
        return vec![
            bulk_write(workbook, items, sheet)
                .unwrap_or_else(|err| CommandResult::from_error(&err)),
        ];
    }
    if let Some(name) = argv.get("function").and_then(serde_json::Value::as_str) {
        return dispatch(workbook, name, argv, sheet);
    }
    vec![CommandResult::failed_message("no operation specified")]
}

/// Write a matrix into the sheet starting at A1, reporting the covered range
/// and the number of rows written.
fn bulk_write(
    workbook: &dyn Workbook,
    items: &[serde_json::Value],
    sheet: Option<&str>,
) -> Result<CommandResult, BridgeError> {
    let rows = items.len();
    let cols = items
        .first()
        .and_then(serde_json::Value::as_array)
        .map(|row| row.len())
        .unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(BridgeError::EmptyInput);
    }

    let address = format!("A1:{}{}", column_number_to_letter(cols as u32), rows);
    let values: Vec<Vec<CellValue>> = items
        .iter()
        .map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(CellValue::from).collect())
                .unwrap_or_default()
        })
        .collect();

    ops::set_range_values(workbook, &address, &values, &SheetTarget::from_context(sheet))?;
    tracing::info!(rows, range = %address, "bulk write complete");
    Ok(CommandResult::ok_message("data written")
        .with("rowsWritten", rows)
        .with("range", address))
}
