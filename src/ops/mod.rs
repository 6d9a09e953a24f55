//! The cell/range operations library.
//!
//! Each operation resolves fresh worksheet/range handles, delegates a single
//! query or mutation to the engine, and returns a typed result. No handle or
//! value survives past one call, so repeated commands always observe live
//! workbook state.

pub mod find;

use crate::engine::{Range as _, Workbook, Worksheet as _};
use crate::error::BridgeError;
use crate::model::{
    AlignOptions, BorderOptions, CellMatch, CellValue, FontOptions, SheetIdentifier, SortOptions,
};
use crate::resolve::{SheetTarget, resolve_range, resolve_sheet, resolve_worksheet};

pub fn get_cell_value(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<CellValue, BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.value()?)
}

pub fn set_cell_value(
    workbook: &dyn Workbook,
    address: &str,
    value: &CellValue,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_value(value)?)
}

pub fn get_range_values(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<Vec<Vec<CellValue>>, BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.values()?)
}

pub fn set_range_values(
    workbook: &dyn Workbook,
    address: &str,
    values: &[Vec<CellValue>],
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_values(values)?)
}

pub fn clear_range(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.clear()?)
}

pub fn clear_range_contents(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.clear_contents()?)
}

pub fn get_cell_formula(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<String, BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.formula()?.unwrap_or_default())
}

pub fn set_cell_formula(
    workbook: &dyn Workbook,
    address: &str,
    formula: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_formula(formula)?)
}

pub fn set_cell_font(
    workbook: &dyn Workbook,
    address: &str,
    font: &FontOptions,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_font(font)?)
}

pub fn set_cell_background_color(
    workbook: &dyn Workbook,
    address: &str,
    color: u32,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_background_color(color)?)
}

pub fn set_cell_alignment(
    workbook: &dyn Workbook,
    address: &str,
    align: &AlignOptions,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_alignment(align)?)
}

pub fn set_cell_border(
    workbook: &dyn Workbook,
    address: &str,
    border: &BorderOptions,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_border(border)?)
}

pub fn set_cell_number_format(
    workbook: &dyn Workbook,
    address: &str,
    format: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.set_number_format(format)?)
}

pub fn merge_cells(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.merge()?)
}

pub fn unmerge_cells(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.unmerge()?)
}

pub fn auto_fit_columns(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    Ok(range.autofit_columns()?)
}

pub fn insert_rows(
    workbook: &dyn Workbook,
    row: u32,
    count: u32,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    for _ in 0..count {
        sheet.insert_row(row)?;
    }
    Ok(())
}

pub fn delete_rows(
    workbook: &dyn Workbook,
    row: u32,
    count: u32,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    for _ in 0..count {
        sheet.delete_row(row)?;
    }
    Ok(())
}

pub fn insert_columns(
    workbook: &dyn Workbook,
    column: u32,
    count: u32,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    for _ in 0..count {
        sheet.insert_column(column)?;
    }
    Ok(())
}

pub fn delete_columns(
    workbook: &dyn Workbook,
    column: u32,
    count: u32,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    for _ in 0..count {
        sheet.delete_column(column)?;
    }
    Ok(())
}

pub fn set_row_height(
    workbook: &dyn Workbook,
    row: u32,
    height: f64,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    Ok(sheet.set_row_height(row, height)?)
}

pub fn set_column_width(
    workbook: &dyn Workbook,
    column: u32,
    width: f64,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    Ok(sheet.set_column_width(column, width)?)
}

/// One full find cycle; backs both the first-match and all-matches commands.
pub fn find_matches(
    workbook: &dyn Workbook,
    search_text: &str,
    search_range: &str,
    target: &SheetTarget,
) -> Result<Vec<CellMatch>, BridgeError> {
    let range = resolve_range(workbook, search_range, target)?;
    Ok(find::scan_matches(&*range, search_text)?.matches)
}

pub fn replace_in_range_with_count(
    workbook: &dyn Workbook,
    search_text: &str,
    replace_text: &str,
    search_range: &str,
    target: &SheetTarget,
) -> Result<usize, BridgeError> {
    let range = resolve_range(workbook, search_range, target)?;
    Ok(find::replace_with_count(&*range, search_text, replace_text)?)
}

/// Bulk replace without the counting pass; true when anything matched.
pub fn replace_in_range(
    workbook: &dyn Workbook,
    search_text: &str,
    replace_text: &str,
    search_range: &str,
    target: &SheetTarget,
) -> Result<bool, BridgeError> {
    let range = resolve_range(workbook, search_range, target)?;
    Ok(range.replace(search_text, replace_text)?)
}

pub fn sort_range(
    workbook: &dyn Workbook,
    address: &str,
    options: &SortOptions,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, address, target)?;
    let key = resolve_range(workbook, &options.key, target)?;
    let descending = options.order == 2;
    Ok(range.sort(key.column(), descending, options.has_header)?)
}

pub fn copy_range(
    workbook: &dyn Workbook,
    source_address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, source_address, target)?;
    Ok(range.copy()?)
}

pub fn paste_to_range(
    workbook: &dyn Workbook,
    target_address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    let range = resolve_range(workbook, target_address, target)?;
    let sheet = resolve_sheet(workbook, target)?;
    Ok(sheet.paste(range.row(), range.column())?)
}

pub fn copy_paste_range(
    workbook: &dyn Workbook,
    source_address: &str,
    target_address: &str,
    target: &SheetTarget,
) -> Result<(), BridgeError> {
    copy_range(workbook, source_address, target)?;
    paste_to_range(workbook, target_address, target)
}

pub fn get_used_range_data(
    workbook: &dyn Workbook,
    target: &SheetTarget,
) -> Result<Vec<Vec<CellValue>>, BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    match sheet.used_range()? {
        Some(range) => Ok(range.values()?),
        None => Ok(Vec::new()),
    }
}

/// Add a worksheet, optionally named; returns the new sheet's name.
pub fn add_worksheet(
    workbook: &dyn Workbook,
    name: Option<&str>,
) -> Result<String, BridgeError> {
    let sheet = workbook.add_sheet(name)?;
    let name = sheet.name();
    tracing::debug!(sheet = %name, "worksheet added");
    Ok(name)
}

/// Add a worksheet unless the name already resolves to one; returns the name
/// of the sheet that ends up existing.
pub fn add_worksheet_if_missing(
    workbook: &dyn Workbook,
    name: &str,
) -> Result<String, BridgeError> {
    if let Some(existing) = resolve_worksheet(workbook, Some(name)) {
        return Ok(existing.name());
    }
    add_worksheet(workbook, Some(name))
}

pub fn delete_worksheet(
    workbook: &dyn Workbook,
    identifier: &SheetIdentifier,
) -> Result<(), BridgeError> {
    let sheet = resolve_sheet(workbook, &SheetTarget::from(identifier))?;
    Ok(workbook.remove_sheet(&sheet.name())?)
}

pub fn worksheet_exists(workbook: &dyn Workbook, name: &str) -> bool {
    resolve_worksheet(workbook, Some(name)).is_some()
}

pub fn worksheet_count(workbook: &dyn Workbook) -> usize {
    workbook.sheet_count()
}

/// All sheet names in workbook order, the documented substitute for a true
/// workbook name, which the host environment does not expose.
pub fn workbook_sheet_names(workbook: &dyn Workbook) -> Vec<String> {
    workbook.sheet_names()
}

pub fn save_workbook(workbook: &dyn Workbook) -> Result<(), BridgeError> {
    Ok(workbook.save()?)
}
