//! Command dispatch: a closed set of named operations over the workbook.
//!
//! Every inbound name is matched against [`CommandKind`] at the boundary;
//! anything outside the set produces the "unknown function" envelope instead
//! of an error. A known command deserializes its parameters from the bag,
//! runs the operation, and folds any failure into a `success:false` envelope,
//! so one bad command never aborts the caller's session.

use crate::engine::Workbook;
use crate::error::BridgeError;
use crate::model::{
    AlignOptions, BorderOptions, CellValue, CommandResult, FontOptions, SheetIdentifier,
    SortOptions,
};
use crate::ops;
use crate::resolve::SheetTarget;
use schemars::JsonSchema;
use serde::Deserialize;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// The closed command set. Names reach the wire in camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum CommandKind {
    GetCellValue,
    SetCellValue,
    GetRangeValues,
    SetRangeValues,
    SetCellFont,
    SetCellBackgroundColor,
    SetCellAlignment,
    SetCellBorder,
    MergeCells,
    UnmergeCells,
    AutoFitColumns,
    InsertRows,
    DeleteRows,
    InsertColumns,
    DeleteColumns,
    SetRowHeight,
    SetColumnWidth,
    FindCell,
    FindAllCells,
    ReplaceInRangeWithCount,
    SortRange,
    CopyPasteRange,
    CopyRange,
    PasteToRange,
    ClearRange,
    ClearRangeContents,
    GetCellFormula,
    SetCellFormula,
    SetCellNumberFormat,
    GetUsedRangeData,
    AddWorksheet,
    DeleteWorksheet,
    WorksheetExists,
    GetWorksheetCount,
    GetWorkbookName,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressParams {
    pub address: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCellValueParams {
    pub address: String,
    pub value: CellValue,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRangeValuesParams {
    pub address: String,
    pub values: Vec<Vec<CellValue>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCellFontParams {
    pub address: String,
    pub font_options: FontOptions,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCellBackgroundColorParams {
    pub address: String,
    pub color: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCellAlignmentParams {
    pub address: String,
    pub align_options: AlignOptions,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCellBorderParams {
    pub address: String,
    pub border_options: BorderOptions,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowParams {
    pub row_index: u32,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnParams {
    pub column_index: u32,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRowHeightParams {
    pub row_index: u32,
    pub height: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetColumnWidthParams {
    pub column_index: u32,
    pub width: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_text: String,
    pub search_range: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceParams {
    pub search_text: String,
    pub replace_text: String,
    pub search_range: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortRangeParams {
    pub address: String,
    pub sort_options: SortOptions,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CopyPasteParams {
    pub source_address: String,
    pub target_address: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CopyRangeParams {
    pub source_address: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasteParams {
    pub target_address: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCellFormulaParams {
    pub address: String,
    pub formula: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetNumberFormatParams {
    pub address: String,
    pub format: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddWorksheetParams {
    #[serde(default)]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWorksheetParams {
    pub sheet_identifier: SheetIdentifier,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetExistsParams {
    pub sheet_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoParams {}

fn default_count() -> u32 {
    1
}

/// Dispatch one command. Always returns a sequence, for uniformity with the
/// bulk-write path; in practice it holds one envelope.
pub fn dispatch(
    workbook: &dyn Workbook,
    name: &str,
    params: &serde_json::Value,
    sheet_context: Option<&str>,
) -> Vec<CommandResult> {
    tracing::debug!(function = name, sheet = sheet_context, "dispatching command");
    let result = CommandKind::from_str(name)
        .map_err(|_| BridgeError::UnknownFunction(name.to_string()))
        .and_then(|kind| execute(workbook, kind, params, sheet_context))
        .unwrap_or_else(|err| {
            tracing::warn!(
                function = name,
                category = err.category(),
                error = %err,
                "command failed"
            );
            CommandResult::from_error(&err)
        });
    vec![result]
}

fn execute(
    workbook: &dyn Workbook,
    kind: CommandKind,
    bag: &serde_json::Value,
    sheet_context: Option<&str>,
) -> Result<CommandResult, BridgeError> {
    let sheet = SheetTarget::from_context(sheet_context);
    match kind {
        CommandKind::GetCellValue => {
            let p: AddressParams = params(kind, bag)?;
            let value = ops::get_cell_value(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok().with("value", value))
        }
        CommandKind::SetCellValue => {
            let p: SetCellValueParams = params(kind, bag)?;
            ops::set_cell_value(workbook, &p.address, &p.value, &sheet)?;
            Ok(CommandResult::ok_message("value set"))
        }
        CommandKind::GetRangeValues => {
            let p: AddressParams = params(kind, bag)?;
            let values = ops::get_range_values(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok().with("values", values))
        }
        CommandKind::SetRangeValues => {
            let p: SetRangeValuesParams = params(kind, bag)?;
            ops::set_range_values(workbook, &p.address, &p.values, &sheet)?;
            Ok(CommandResult::ok_message("values set"))
        }
        CommandKind::SetCellFont => {
            let p: SetCellFontParams = params(kind, bag)?;
            ops::set_cell_font(workbook, &p.address, &p.font_options, &sheet)?;
            Ok(CommandResult::ok_message("font applied"))
        }
        CommandKind::SetCellBackgroundColor => {
            let p: SetCellBackgroundColorParams = params(kind, bag)?;
            ops::set_cell_background_color(workbook, &p.address, p.color, &sheet)?;
            Ok(CommandResult::ok_message("background color applied"))
        }
        CommandKind::SetCellAlignment => {
            let p: SetCellAlignmentParams = params(kind, bag)?;
            ops::set_cell_alignment(workbook, &p.address, &p.align_options, &sheet)?;
            Ok(CommandResult::ok_message("alignment applied"))
        }
        CommandKind::SetCellBorder => {
            let p: SetCellBorderParams = params(kind, bag)?;
            ops::set_cell_border(workbook, &p.address, &p.border_options, &sheet)?;
            Ok(CommandResult::ok_message("border applied"))
        }
        CommandKind::MergeCells => {
            let p: AddressParams = params(kind, bag)?;
            ops::merge_cells(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok_message("cells merged"))
        }
        CommandKind::UnmergeCells => {
            let p: AddressParams = params(kind, bag)?;
            ops::unmerge_cells(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok_message("cells unmerged"))
        }
        CommandKind::AutoFitColumns => {
            let p: AddressParams = params(kind, bag)?;
            ops::auto_fit_columns(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok_message("columns autofitted"))
        }
        CommandKind::InsertRows => {
            let p: RowParams = params(kind, bag)?;
            ops::insert_rows(workbook, p.row_index, p.count, &sheet)?;
            Ok(CommandResult::ok_message("rows inserted"))
        }
        CommandKind::DeleteRows => {
            let p: RowParams = params(kind, bag)?;
            ops::delete_rows(workbook, p.row_index, p.count, &sheet)?;
            Ok(CommandResult::ok_message("rows deleted"))
        }
        CommandKind::InsertColumns => {
            let p: ColumnParams = params(kind, bag)?;
            ops::insert_columns(workbook, p.column_index, p.count, &sheet)?;
            Ok(CommandResult::ok_message("columns inserted"))
        }
        CommandKind::DeleteColumns => {
            let p: ColumnParams = params(kind, bag)?;
            ops::delete_columns(workbook, p.column_index, p.count, &sheet)?;
            Ok(CommandResult::ok_message("columns deleted"))
        }
        CommandKind::SetRowHeight => {
            let p: SetRowHeightParams = params(kind, bag)?;
            ops::set_row_height(workbook, p.row_index, p.height, &sheet)?;
            Ok(CommandResult::ok_message("row height set"))
        }
        CommandKind::SetColumnWidth => {
            let p: SetColumnWidthParams = params(kind, bag)?;
            ops::set_column_width(workbook, p.column_index, p.width, &sheet)?;
            Ok(CommandResult::ok_message("column width set"))
        }
        CommandKind::FindCell => {
            let p: SearchParams = params(kind, bag)?;
            let cells = ops::find_matches(workbook, &p.search_text, &p.search_range, &sheet)?;
            Ok(CommandResult::ok()
                .with("found", !cells.is_empty())
                .with("cells", cells))
        }
        CommandKind::FindAllCells => {
            let p: SearchParams = params(kind, bag)?;
            let cells = ops::find_matches(workbook, &p.search_text, &p.search_range, &sheet)?;
            let count = cells.len();
            Ok(CommandResult::ok().with("cells", cells).with("count", count))
        }
        CommandKind::ReplaceInRangeWithCount => {
            let p: ReplaceParams = params(kind, bag)?;
            let count = ops::replace_in_range_with_count(
                workbook,
                &p.search_text,
                &p.replace_text,
                &p.search_range,
                &sheet,
            )?;
            Ok(CommandResult::ok().with("count", count))
        }
        CommandKind::SortRange => {
            let p: SortRangeParams = params(kind, bag)?;
            ops::sort_range(workbook, &p.address, &p.sort_options, &sheet)?;
            Ok(CommandResult::ok_message("range sorted"))
        }
        CommandKind::CopyPasteRange => {
            let p: CopyPasteParams = params(kind, bag)?;
            ops::copy_paste_range(workbook, &p.source_address, &p.target_address, &sheet)?;
            Ok(CommandResult::ok_message("range copied and pasted"))
        }
        CommandKind::CopyRange => {
            let p: CopyRangeParams = params(kind, bag)?;
            ops::copy_range(workbook, &p.source_address, &sheet)?;
            Ok(CommandResult::ok_message("range copied"))
        }
        CommandKind::PasteToRange => {
            let p: PasteParams = params(kind, bag)?;
            ops::paste_to_range(workbook, &p.target_address, &sheet)?;
            Ok(CommandResult::ok_message("range pasted"))
        }
        CommandKind::ClearRange => {
            let p: AddressParams = params(kind, bag)?;
            ops::clear_range(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok_message("range cleared"))
        }
        CommandKind::ClearRangeContents => {
            let p: AddressParams = params(kind, bag)?;
            ops::clear_range_contents(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok_message("contents cleared"))
        }
        CommandKind::GetCellFormula => {
            let p: AddressParams = params(kind, bag)?;
            let formula = ops::get_cell_formula(workbook, &p.address, &sheet)?;
            Ok(CommandResult::ok().with("formula", formula))
        }
        CommandKind::SetCellFormula => {
            let p: SetCellFormulaParams = params(kind, bag)?;
            ops::set_cell_formula(workbook, &p.address, &p.formula, &sheet)?;
            Ok(CommandResult::ok_message("formula set"))
        }
        CommandKind::SetCellNumberFormat => {
            let p: SetNumberFormatParams = params(kind, bag)?;
            ops::set_cell_number_format(workbook, &p.address, &p.format, &sheet)?;
            Ok(CommandResult::ok_message("number format set"))
        }
        CommandKind::GetUsedRangeData => {
            let data = ops::get_used_range_data(workbook, &sheet)?;
            Ok(CommandResult::ok().with("data", data))
        }
        CommandKind::AddWorksheet => {
            let p: AddWorksheetParams = params(kind, bag)?;
            let name = ops::add_worksheet(workbook, p.sheet_name.as_deref())?;
            Ok(CommandResult::ok_message("worksheet added").with("sheetName", name))
        }
        CommandKind::DeleteWorksheet => {
            let p: DeleteWorksheetParams = params(kind, bag)?;
            ops::delete_worksheet(workbook, &p.sheet_identifier)?;
            Ok(CommandResult::ok_message("worksheet deleted"))
        }
        CommandKind::WorksheetExists => {
            let p: WorksheetExistsParams = params(kind, bag)?;
            let exists = ops::worksheet_exists(workbook, &p.sheet_name);
            Ok(CommandResult::ok().with("exists", exists))
        }
        CommandKind::GetWorksheetCount => {
            Ok(CommandResult::ok().with("count", ops::worksheet_count(workbook)))
        }
        CommandKind::GetWorkbookName => {
            Ok(CommandResult::ok().with("sheets", ops::workbook_sheet_names(workbook)))
        }
    }
}

fn params<T: serde::de::DeserializeOwned>(
    kind: CommandKind,
    bag: &serde_json::Value,
) -> Result<T, BridgeError> {
    serde_json::from_value(bag.clone()).map_err(|err| BridgeError::InvalidParams {
        function: kind.as_ref().to_string(),
        message: err.to_string(),
    })
}

/// Every supported command name with its parameter schema, in declaration
/// order.
pub fn command_catalog() -> Vec<(String, schemars::Schema)> {
    CommandKind::iter()
        .map(|kind| (kind.as_ref().to_string(), parameter_schema(kind)))
        .collect()
}

fn parameter_schema(kind: CommandKind) -> schemars::Schema {
    use schemars::schema_for;
    match kind {
        CommandKind::GetCellValue
        | CommandKind::GetRangeValues
        | CommandKind::MergeCells
        | CommandKind::UnmergeCells
        | CommandKind::AutoFitColumns
        | CommandKind::ClearRange
        | CommandKind::ClearRangeContents
        | CommandKind::GetCellFormula => schema_for!(AddressParams),
        CommandKind::SetCellValue => schema_for!(SetCellValueParams),
        CommandKind::SetRangeValues => schema_for!(SetRangeValuesParams),
        CommandKind::SetCellFont => schema_for!(SetCellFontParams),
        CommandKind::SetCellBackgroundColor => schema_for!(SetCellBackgroundColorParams),
        CommandKind::SetCellAlignment => schema_for!(SetCellAlignmentParams),
        CommandKind::SetCellBorder => schema_for!(SetCellBorderParams),
        CommandKind::InsertRows | CommandKind::DeleteRows => schema_for!(RowParams),
        CommandKind::InsertColumns | CommandKind::DeleteColumns => schema_for!(ColumnParams),
        CommandKind::SetRowHeight => schema_for!(SetRowHeightParams),
        CommandKind::SetColumnWidth => schema_for!(SetColumnWidthParams),
        CommandKind::FindCell | CommandKind::FindAllCells => schema_for!(SearchParams),
        CommandKind::ReplaceInRangeWithCount => schema_for!(ReplaceParams),
        CommandKind::SortRange => schema_for!(SortRangeParams),
        CommandKind::CopyPasteRange => schema_for!(CopyPasteParams),
        CommandKind::CopyRange => schema_for!(CopyRangeParams),
        CommandKind::PasteToRange => schema_for!(PasteParams),
        CommandKind::SetCellFormula => schema_for!(SetCellFormulaParams),
        CommandKind::SetCellNumberFormat => schema_for!(SetNumberFormatParams),
        CommandKind::AddWorksheet => schema_for!(AddWorksheetParams),
        CommandKind::DeleteWorksheet => schema_for!(DeleteWorksheetParams),
        CommandKind::WorksheetExists => schema_for!(WorksheetExistsParams),
        CommandKind::GetUsedRangeData
        | CommandKind::GetWorksheetCount
        | CommandKind::GetWorkbookName => schema_for!(NoParams),
    }
}
