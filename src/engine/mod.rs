//! The external spreadsheet object model as a capability surface.
//!
//! The facade never owns spreadsheet state: every operation borrows a
//! worksheet or range handle for the duration of one call and discards it.
//! These traits mirror the host application's workbook/worksheet/range
//! members; [`memory`] provides the in-process implementation used by the
//! binary and the test suite.

pub mod memory;

use crate::model::{AlignOptions, BorderOptions, CellMatch, CellValue, FontOptions};
use std::sync::Arc;
use thiserror::Error;

pub type SheetHandle = Arc<dyn Worksheet>;
pub type RangeHandle = Box<dyn Range>;

/// Failures raised by the underlying object model.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid range address: {0}")]
    InvalidAddress(String),
    #[error("worksheet index {0} out of bounds")]
    SheetIndexOutOfBounds(i64),
    #[error("row or column index {0} out of range")]
    IndexOutOfRange(u32),
    #[error("worksheet {0} already exists")]
    SheetNameTaken(String),
    #[error("worksheet {0} no longer exists")]
    SheetMissing(String),
    #[error("cannot delete the last worksheet")]
    LastSheet,
    #[error("nothing to paste: clipboard is empty")]
    ClipboardEmpty,
    #[error("workbook storage: {0}")]
    Storage(String),
}

/// The active workbook: an ordered sheet collection plus ambient state
/// (active sheet, clipboard, backing file).
pub trait Workbook {
    fn sheet_count(&self) -> usize;
    fn sheet_names(&self) -> Vec<String>;
    /// Sheet by 0-based position in workbook order.
    fn sheet_at(&self, index: usize) -> Option<SheetHandle>;
    fn active_sheet(&self) -> SheetHandle;
    /// Add a sheet, optionally named; the new sheet becomes active.
    fn add_sheet(&self, name: Option<&str>) -> Result<SheetHandle, EngineError>;
    /// Remove the sheet with this exact name.
    fn remove_sheet(&self, name: &str) -> Result<(), EngineError>;
    fn save(&self) -> Result<(), EngineError>;
}

pub trait Worksheet: std::fmt::Debug {
    fn name(&self) -> String;
    /// Resolve an A1-notation address to a range on this sheet.
    fn range(&self, address: &str) -> Result<RangeHandle, EngineError>;
    /// The rectangle spanned by all non-empty cells, or `None` when blank.
    fn used_range(&self) -> Result<Option<RangeHandle>, EngineError>;
    fn insert_row(&self, row: u32) -> Result<(), EngineError>;
    fn delete_row(&self, row: u32) -> Result<(), EngineError>;
    fn insert_column(&self, column: u32) -> Result<(), EngineError>;
    fn delete_column(&self, column: u32) -> Result<(), EngineError>;
    fn set_row_height(&self, row: u32, height: f64) -> Result<(), EngineError>;
    fn set_column_width(&self, column: u32, width: f64) -> Result<(), EngineError>;
    /// Paste the workbook clipboard anchored at the given cell.
    fn paste(&self, anchor_row: u32, anchor_column: u32) -> Result<(), EngineError>;
}

pub trait Range: std::fmt::Debug {
    fn address(&self) -> String;
    /// Top-left row, 1-based.
    fn row(&self) -> u32;
    /// Top-left column, 1-based.
    fn column(&self) -> u32;

    fn value(&self) -> Result<CellValue, EngineError>;
    fn values(&self) -> Result<Vec<Vec<CellValue>>, EngineError>;
    /// Fill every cell of the range with one value, clearing formulas.
    fn set_value(&self, value: &CellValue) -> Result<(), EngineError>;
    /// Write a matrix anchored at the range's top-left cell.
    fn set_values(&self, values: &[Vec<CellValue>]) -> Result<(), EngineError>;

    /// The stored formula, or the display text of a plain value.
    fn formula(&self) -> Result<Option<String>, EngineError>;
    fn set_formula(&self, formula: &str) -> Result<(), EngineError>;

    fn set_font(&self, font: &FontOptions) -> Result<(), EngineError>;
    fn set_background_color(&self, color: u32) -> Result<(), EngineError>;
    fn set_alignment(&self, align: &AlignOptions) -> Result<(), EngineError>;
    fn set_border(&self, border: &BorderOptions) -> Result<(), EngineError>;
    fn set_number_format(&self, format: &str) -> Result<(), EngineError>;

    fn merge(&self) -> Result<(), EngineError>;
    fn unmerge(&self) -> Result<(), EngineError>;
    fn autofit_columns(&self) -> Result<(), EngineError>;
    fn clear(&self) -> Result<(), EngineError>;
    fn clear_contents(&self) -> Result<(), EngineError>;

    /// First match for `text` within the range, row-major order.
    fn find(&self, text: &str) -> Result<Option<CellMatch>, EngineError>;
    /// Next match strictly after `after`, wrapping circularly to the first
    /// match when the end of the range is passed.
    fn find_next(&self, text: &str, after: &CellMatch) -> Result<Option<CellMatch>, EngineError>;
    /// Bulk substring replace across the range; true when anything changed.
    fn replace(&self, search: &str, replace: &str) -> Result<bool, EngineError>;

    /// Sort the range's rows by the given absolute key column.
    fn sort(&self, key_column: u32, descending: bool, has_header: bool) -> Result<(), EngineError>;
    /// Copy this range's cells to the workbook clipboard.
    fn copy(&self) -> Result<(), EngineError>;
}
