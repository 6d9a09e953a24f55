//! In-memory spreadsheet engine.
//!
//! Backs the binary and the test suite with a sparse cell grid per sheet,
//! a workbook-level clipboard, and JSON load/save. This module also pins the
//! observable semantics the facade's tests rely on: find is a case-sensitive
//! substring match over display text in row-major order with circular wrap,
//! replace rewrites the display text of matching cells, and sort is a stable
//! row sort with empty cells ordered last in both directions.

use crate::engine::{EngineError, Range, RangeHandle, SheetHandle, Workbook, Worksheet};
use crate::model::{AlignOptions, BorderOptions, CellMatch, CellValue, FontOptions};
use crate::utils::{self, ParsedRange, RangeBounds};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_alignment: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_line_style: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

fn style_is_default(style: &CellStyle) -> bool {
    *style == CellStyle::default()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Cell {
    #[serde(skip_serializing_if = "CellValue::is_empty")]
    value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    formula: Option<String>,
    #[serde(skip_serializing_if = "style_is_default")]
    style: CellStyle,
}

impl Cell {
    fn is_blank_content(&self) -> bool {
        self.value.is_empty() && self.formula.is_none()
    }
}

#[derive(Debug, Default)]
struct SheetState {
    name: String,
    /// Keyed by (row, column) so iteration order is row-major.
    cells: BTreeMap<(u32, u32), Cell>,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u32, f64>,
    merged: Vec<RangeBounds>,
}

impl SheetState {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn used_extent(&self) -> Option<RangeBounds> {
        let mut extent: Option<RangeBounds> = None;
        for (&(row, col), cell) in &self.cells {
            if cell.is_blank_content() {
                continue;
            }
            extent = Some(match extent {
                None => RangeBounds::cell(col, row),
                Some(b) => RangeBounds {
                    start_col: b.start_col.min(col),
                    start_row: b.start_row.min(row),
                    end_col: b.end_col.max(col),
                    end_row: b.end_row.max(row),
                },
            });
        }
        extent
    }

    fn insert_row_at(&mut self, row: u32) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((r, c), cell)| (if r >= row { (r + 1, c) } else { (r, c) }, cell))
            .collect();
        let heights = std::mem::take(&mut self.row_heights);
        self.row_heights = heights
            .into_iter()
            .map(|(r, h)| (if r >= row { r + 1 } else { r }, h))
            .collect();
        for region in &mut self.merged {
            if region.start_row >= row {
                region.start_row += 1;
                region.end_row += 1;
            } else if region.end_row >= row {
                region.end_row += 1;
            }
        }
    }

    fn delete_row_at(&mut self, row: u32) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|((r, _), _)| *r != row)
            .map(|((r, c), cell)| (if r > row { (r - 1, c) } else { (r, c) }, cell))
            .collect();
        let heights = std::mem::take(&mut self.row_heights);
        self.row_heights = heights
            .into_iter()
            .filter(|(r, _)| *r != row)
            .map(|(r, h)| (if r > row { r - 1 } else { r }, h))
            .collect();
        for region in &mut self.merged {
            if region.start_row > row {
                region.start_row -= 1;
            }
            if region.end_row >= row {
                region.end_row -= 1;
            }
        }
        self.merged
            .retain(|region| region.end_row >= region.start_row && region.end_row >= 1);
    }

    fn insert_column_at(&mut self, column: u32) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|((r, c), cell)| (if c >= column { (r, c + 1) } else { (r, c) }, cell))
            .collect();
        let widths = std::mem::take(&mut self.column_widths);
        self.column_widths = widths
            .into_iter()
            .map(|(c, w)| (if c >= column { c + 1 } else { c }, w))
            .collect();
        for region in &mut self.merged {
            if region.start_col >= column {
                region.start_col += 1;
                region.end_col += 1;
            } else if region.end_col >= column {
                region.end_col += 1;
            }
        }
    }

    fn delete_column_at(&mut self, column: u32) {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter(|((_, c), _)| *c != column)
            .map(|((r, c), cell)| (if c > column { (r, c - 1) } else { (r, c) }, cell))
            .collect();
        let widths = std::mem::take(&mut self.column_widths);
        self.column_widths = widths
            .into_iter()
            .filter(|(c, _)| *c != column)
            .map(|(c, w)| (if c > column { c - 1 } else { c }, w))
            .collect();
        for region in &mut self.merged {
            if region.start_col > column {
                region.start_col -= 1;
            }
            if region.end_col >= column {
                region.end_col -= 1;
            }
        }
        self.merged
            .retain(|region| region.end_col >= region.start_col && region.end_col >= 1);
    }
}

#[derive(Debug)]
struct WorkbookState {
    sheets: Vec<SheetState>,
    active: usize,
    clipboard: Option<Vec<Vec<Option<Cell>>>>,
    path: Option<PathBuf>,
}

impl WorkbookState {
    fn sheet_index(&self, name: &str) -> Result<usize, EngineError> {
        self.sheets
            .iter()
            .position(|sheet| sheet.name == name)
            .ok_or_else(|| EngineError::SheetMissing(name.to_string()))
    }
}

/// An in-memory workbook implementing the full engine surface.
#[derive(Debug)]
pub struct MemoryEngine {
    inner: Arc<RwLock<WorkbookState>>,
}

impl MemoryEngine {
    /// A blank workbook with a single "Sheet1".
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(WorkbookState {
                sheets: vec![SheetState::named("Sheet1")],
                active: 0,
                clipboard: None,
                path: None,
            })),
        }
    }

    /// Load a workbook document from a JSON file; `save` writes back to it.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| EngineError::Storage(format!("read {}: {}", path.display(), e)))?;
        let doc: WorkbookDoc = serde_json::from_str(&raw)
            .map_err(|e| EngineError::Storage(format!("parse {}: {}", path.display(), e)))?;
        let engine = Self::from_doc(doc)?;
        engine.inner.write().path = Some(path.to_path_buf());
        Ok(engine)
    }

    fn from_doc(doc: WorkbookDoc) -> Result<Self, EngineError> {
        let mut sheets = Vec::with_capacity(doc.sheets.len().max(1));
        for sheet_doc in doc.sheets {
            if sheets
                .iter()
                .any(|s: &SheetState| s.name == sheet_doc.name)
            {
                return Err(EngineError::Storage(format!(
                    "duplicate sheet name {}",
                    sheet_doc.name
                )));
            }
            let mut sheet = SheetState::named(&sheet_doc.name);
            for (key, cell) in sheet_doc.cells {
                let (col, row) = utils::parse_cell_ref(&key).ok_or_else(|| {
                    EngineError::Storage(format!(
                        "invalid cell address {} in sheet {}",
                        key, sheet_doc.name
                    ))
                })?;
                sheet.cells.insert((row, col), cell);
            }
            sheet.row_heights = sheet_doc.row_heights;
            sheet.column_widths = sheet_doc.column_widths;
            for address in sheet_doc.merged {
                match utils::parse_range_ref(&address) {
                    Some(ParsedRange::Cells(bounds)) => sheet.merged.push(bounds),
                    _ => {
                        return Err(EngineError::Storage(format!(
                            "invalid merged region {} in sheet {}",
                            address, sheet_doc.name
                        )));
                    }
                }
            }
            sheets.push(sheet);
        }
        if sheets.is_empty() {
            sheets.push(SheetState::named("Sheet1"));
        }
        let active = doc
            .active_sheet
            .as_deref()
            .and_then(|name| sheets.iter().position(|s| s.name == name))
            .unwrap_or(0);
        Ok(Self {
            inner: Arc::new(RwLock::new(WorkbookState {
                sheets,
                active,
                clipboard: None,
                path: None,
            })),
        })
    }

    fn to_doc(state: &WorkbookState) -> WorkbookDoc {
        WorkbookDoc {
            active_sheet: state.sheets.get(state.active).map(|s| s.name.clone()),
            sheets: state
                .sheets
                .iter()
                .map(|sheet| SheetDoc {
                    name: sheet.name.clone(),
                    cells: sheet
                        .cells
                        .iter()
                        .map(|(&(row, col), cell)| (utils::cell_address(col, row), cell.clone()))
                        .collect(),
                    row_heights: sheet.row_heights.clone(),
                    column_widths: sheet.column_widths.clone(),
                    merged: sheet.merged.iter().map(|b| b.to_address()).collect(),
                })
                .collect(),
        }
    }

    fn handle(&self, name: &str) -> SheetHandle {
        Arc::new(MemorySheet {
            inner: self.inner.clone(),
            name: name.to_string(),
        })
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook for MemoryEngine {
    fn sheet_count(&self) -> usize {
        self.inner.read().sheets.len()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.inner
            .read()
            .sheets
            .iter()
            .map(|sheet| sheet.name.clone())
            .collect()
    }

    fn sheet_at(&self, index: usize) -> Option<SheetHandle> {
        let name = self.inner.read().sheets.get(index)?.name.clone();
        Some(self.handle(&name))
    }

    fn active_sheet(&self) -> SheetHandle {
        let state = self.inner.read();
        let name = state.sheets[state.active].name.clone();
        drop(state);
        self.handle(&name)
    }

    fn add_sheet(&self, name: Option<&str>) -> Result<SheetHandle, EngineError> {
        let mut state = self.inner.write();
        let name = match name {
            Some(requested) => {
                if state.sheets.iter().any(|s| s.name == requested) {
                    return Err(EngineError::SheetNameTaken(requested.to_string()));
                }
                requested.to_string()
            }
            None => {
                let mut n = state.sheets.len() + 1;
                loop {
                    let candidate = format!("Sheet{}", n);
                    if !state.sheets.iter().any(|s| s.name == candidate) {
                        break candidate;
                    }
                    n += 1;
                }
            }
        };
        state.sheets.push(SheetState::named(&name));
        state.active = state.sheets.len() - 1;
        drop(state);
        Ok(self.handle(&name))
    }

    fn remove_sheet(&self, name: &str) -> Result<(), EngineError> {
        let mut state = self.inner.write();
        let index = state.sheet_index(name)?;
        if state.sheets.len() == 1 {
            return Err(EngineError::LastSheet);
        }
        state.sheets.remove(index);
        if index < state.active {
            state.active -= 1;
        } else if state.active >= state.sheets.len() {
            state.active = state.sheets.len() - 1;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), EngineError> {
        let state = self.inner.read();
        let path = state
            .path
            .clone()
            .ok_or_else(|| EngineError::Storage("workbook has no backing file".to_string()))?;
        let doc = Self::to_doc(&state);
        drop(state);
        let rendered = serde_json::to_string_pretty(&doc)
            .map_err(|e| EngineError::Storage(format!("encode workbook: {}", e)))?;
        fs::write(&path, rendered)
            .map_err(|e| EngineError::Storage(format!("write {}: {}", path.display(), e)))
    }
}

#[derive(Debug)]
struct MemorySheet {
    inner: Arc<RwLock<WorkbookState>>,
    name: String,
}

impl MemorySheet {
    fn with_sheet_mut<T>(
        &self,
        f: impl FnOnce(&mut SheetState) -> T,
    ) -> Result<T, EngineError> {
        let mut state = self.inner.write();
        let index = state.sheet_index(&self.name)?;
        Ok(f(&mut state.sheets[index]))
    }
}

impl Worksheet for MemorySheet {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn range(&self, address: &str) -> Result<RangeHandle, EngineError> {
        let parsed = utils::parse_range_ref(address)
            .ok_or_else(|| EngineError::InvalidAddress(address.to_string()))?;
        let bounds = match parsed {
            ParsedRange::Cells(bounds) => bounds,
            ParsedRange::Columns { start, end } => {
                let end_row = self
                    .with_sheet_mut(|sheet| sheet.used_extent().map(|b| b.end_row))?
                    .unwrap_or(1);
                RangeBounds {
                    start_col: start,
                    start_row: 1,
                    end_col: end,
                    end_row,
                }
            }
            ParsedRange::Rows { start, end } => {
                let end_col = self
                    .with_sheet_mut(|sheet| sheet.used_extent().map(|b| b.end_col))?
                    .unwrap_or(1);
                RangeBounds {
                    start_col: 1,
                    start_row: start,
                    end_col,
                    end_row: end,
                }
            }
        };
        Ok(Box::new(MemoryRange {
            inner: self.inner.clone(),
            sheet: self.name.clone(),
            bounds,
            address: address.to_string(),
        }))
    }

    fn used_range(&self) -> Result<Option<RangeHandle>, EngineError> {
        let extent = self.with_sheet_mut(|sheet| sheet.used_extent())?;
        Ok(extent.map(|bounds| {
            Box::new(MemoryRange {
                inner: self.inner.clone(),
                sheet: self.name.clone(),
                bounds,
                address: bounds.to_address(),
            }) as RangeHandle
        }))
    }

    fn insert_row(&self, row: u32) -> Result<(), EngineError> {
        check_index(row)?;
        self.with_sheet_mut(|sheet| sheet.insert_row_at(row))
    }

    fn delete_row(&self, row: u32) -> Result<(), EngineError> {
        check_index(row)?;
        self.with_sheet_mut(|sheet| sheet.delete_row_at(row))
    }

    fn insert_column(&self, column: u32) -> Result<(), EngineError> {
        check_index(column)?;
        self.with_sheet_mut(|sheet| sheet.insert_column_at(column))
    }

    fn delete_column(&self, column: u32) -> Result<(), EngineError> {
        check_index(column)?;
        self.with_sheet_mut(|sheet| sheet.delete_column_at(column))
    }

    fn set_row_height(&self, row: u32, height: f64) -> Result<(), EngineError> {
        check_index(row)?;
        self.with_sheet_mut(|sheet| {
            sheet.row_heights.insert(row, height);
        })
    }

    fn set_column_width(&self, column: u32, width: f64) -> Result<(), EngineError> {
        check_index(column)?;
        self.with_sheet_mut(|sheet| {
            sheet.column_widths.insert(column, width);
        })
    }

    fn paste(&self, anchor_row: u32, anchor_column: u32) -> Result<(), EngineError> {
        let mut state = self.inner.write();
        let snapshot = state
            .clipboard
            .clone()
            .ok_or(EngineError::ClipboardEmpty)?;
        let index = state.sheet_index(&self.name)?;
        let sheet = &mut state.sheets[index];
        for (ri, row) in snapshot.iter().enumerate() {
            for (ci, cell) in row.iter().enumerate() {
                let pos = (anchor_row + ri as u32, anchor_column + ci as u32);
                match cell {
                    Some(cell) => {
                        sheet.cells.insert(pos, cell.clone());
                    }
                    None => {
                        sheet.cells.remove(&pos);
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct MemoryRange {
    inner: Arc<RwLock<WorkbookState>>,
    sheet: String,
    bounds: RangeBounds,
    address: String,
}

impl MemoryRange {
    fn with_sheet<T>(&self, f: impl FnOnce(&SheetState) -> T) -> Result<T, EngineError> {
        let state = self.inner.read();
        let index = state.sheet_index(&self.sheet)?;
        Ok(f(&state.sheets[index]))
    }

    fn with_sheet_mut<T>(
        &self,
        f: impl FnOnce(&mut SheetState) -> T,
    ) -> Result<T, EngineError> {
        let mut state = self.inner.write();
        let index = state.sheet_index(&self.sheet)?;
        Ok(f(&mut state.sheets[index]))
    }

    fn apply_style(&self, f: impl Fn(&mut CellStyle)) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            for row in bounds.start_row..=bounds.end_row {
                for col in bounds.start_col..=bounds.end_col {
                    let cell = sheet.cells.entry((row, col)).or_default();
                    f(&mut cell.style);
                }
            }
        })
    }

    /// Row-major scan for the first matching cell, optionally starting
    /// strictly after a position.
    fn scan_match(
        sheet: &SheetState,
        bounds: &RangeBounds,
        text: &str,
        after: Option<(u32, u32)>,
    ) -> Option<CellMatch> {
        sheet
            .cells
            .iter()
            .filter(|((row, col), _)| bounds.contains(*row, *col))
            .filter(|(pos, _)| after.is_none_or(|a| **pos > a))
            .find(|(_, cell)| cell_matches(cell, text))
            .map(|(&(row, col), cell)| CellMatch {
                address: utils::cell_address(col, row),
                value: cell.value.clone(),
                row,
                column: col,
            })
    }
}

// Row and column indices are 1-based on the wire.
fn check_index(index: u32) -> Result<(), EngineError> {
    if index == 0 {
        return Err(EngineError::IndexOutOfRange(index));
    }
    Ok(())
}

fn cell_matches(cell: &Cell, text: &str) -> bool {
    let display = cell.value.display_text();
    !display.is_empty() && display.contains(text)
}

impl Range for MemoryRange {
    fn address(&self) -> String {
        self.address.clone()
    }

    fn row(&self) -> u32 {
        self.bounds.start_row
    }

    fn column(&self) -> u32 {
        self.bounds.start_col
    }

    fn value(&self) -> Result<CellValue, EngineError> {
        let pos = (self.bounds.start_row, self.bounds.start_col);
        self.with_sheet(|sheet| {
            sheet
                .cells
                .get(&pos)
                .map(|cell| cell.value.clone())
                .unwrap_or_default()
        })
    }

    fn values(&self) -> Result<Vec<Vec<CellValue>>, EngineError> {
        let bounds = self.bounds;
        self.with_sheet(|sheet| {
            (bounds.start_row..=bounds.end_row)
                .map(|row| {
                    (bounds.start_col..=bounds.end_col)
                        .map(|col| {
                            sheet
                                .cells
                                .get(&(row, col))
                                .map(|cell| cell.value.clone())
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .collect()
        })
    }

    fn set_value(&self, value: &CellValue) -> Result<(), EngineError> {
        let bounds = self.bounds;
        let value = value.clone();
        self.with_sheet_mut(|sheet| {
            for row in bounds.start_row..=bounds.end_row {
                for col in bounds.start_col..=bounds.end_col {
                    let cell = sheet.cells.entry((row, col)).or_default();
                    cell.value = value.clone();
                    cell.formula = None;
                }
            }
        })
    }

    fn set_values(&self, values: &[Vec<CellValue>]) -> Result<(), EngineError> {
        let anchor = (self.bounds.start_row, self.bounds.start_col);
        self.with_sheet_mut(|sheet| {
            for (ri, row) in values.iter().enumerate() {
                for (ci, value) in row.iter().enumerate() {
                    let pos = (anchor.0 + ri as u32, anchor.1 + ci as u32);
                    let cell = sheet.cells.entry(pos).or_default();
                    cell.value = value.clone();
                    cell.formula = None;
                }
            }
        })
    }

    fn formula(&self) -> Result<Option<String>, EngineError> {
        let pos = (self.bounds.start_row, self.bounds.start_col);
        self.with_sheet(|sheet| {
            let cell = sheet.cells.get(&pos)?;
            // Like the host application, a plain value cell reports its
            // display text as its formula.
            cell.formula.clone().or_else(|| {
                if cell.value.is_empty() {
                    None
                } else {
                    Some(cell.value.display_text())
                }
            })
        })
    }

    fn set_formula(&self, formula: &str) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            for row in bounds.start_row..=bounds.end_row {
                for col in bounds.start_col..=bounds.end_col {
                    let cell = sheet.cells.entry((row, col)).or_default();
                    cell.formula = Some(formula.to_string());
                }
            }
        })
    }

    fn set_font(&self, font: &FontOptions) -> Result<(), EngineError> {
        self.apply_style(|style| {
            if let Some(name) = &font.name {
                style.font_name = Some(name.clone());
            }
            if let Some(size) = font.size {
                style.font_size = Some(size);
            }
            if let Some(bold) = font.bold {
                style.bold = Some(bold);
            }
            if let Some(italic) = font.italic {
                style.italic = Some(italic);
            }
            if let Some(color) = font.color {
                style.font_color = Some(color);
            }
        })
    }

    fn set_background_color(&self, color: u32) -> Result<(), EngineError> {
        self.apply_style(|style| style.background_color = Some(color))
    }

    fn set_alignment(&self, align: &AlignOptions) -> Result<(), EngineError> {
        self.apply_style(|style| {
            if let Some(horizontal) = align.horizontal {
                style.horizontal_alignment = Some(horizontal);
            }
            if let Some(vertical) = align.vertical {
                style.vertical_alignment = Some(vertical);
            }
        })
    }

    fn set_border(&self, border: &BorderOptions) -> Result<(), EngineError> {
        self.apply_style(|style| {
            if let Some(line_style) = border.line_style {
                style.border_line_style = Some(line_style);
            }
            if let Some(weight) = border.weight {
                style.border_weight = Some(weight);
            }
            if let Some(color) = border.color {
                style.border_color = Some(color);
            }
        })
    }

    fn set_number_format(&self, format: &str) -> Result<(), EngineError> {
        self.apply_style(|style| style.number_format = Some(format.to_string()))
    }

    fn merge(&self) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            if !sheet.merged.contains(&bounds) {
                sheet.merged.push(bounds);
            }
        })
    }

    fn unmerge(&self) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            sheet.merged.retain(|region| !region.intersects(&bounds));
        })
    }

    fn autofit_columns(&self) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            for col in bounds.start_col..=bounds.end_col {
                let longest = (bounds.start_row..=bounds.end_row)
                    .filter_map(|row| sheet.cells.get(&(row, col)))
                    .map(|cell| cell.value.display_text().chars().count())
                    .max()
                    .unwrap_or(0);
                let width = if longest == 0 {
                    DEFAULT_COLUMN_WIDTH
                } else {
                    longest as f64 + 2.0
                };
                sheet.column_widths.insert(col, width);
            }
        })
    }

    fn clear(&self) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            sheet
                .cells
                .retain(|&(row, col), _| !bounds.contains(row, col));
        })
    }

    fn clear_contents(&self) -> Result<(), EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            for (_, cell) in sheet
                .cells
                .iter_mut()
                .filter(|((row, col), _)| bounds.contains(*row, *col))
            {
                cell.value = CellValue::Empty;
                cell.formula = None;
            }
        })
    }

    fn find(&self, text: &str) -> Result<Option<CellMatch>, EngineError> {
        let bounds = self.bounds;
        self.with_sheet(|sheet| Self::scan_match(sheet, &bounds, text, None))
    }

    fn find_next(&self, text: &str, after: &CellMatch) -> Result<Option<CellMatch>, EngineError> {
        let bounds = self.bounds;
        let position = (after.row, after.column);
        self.with_sheet(|sheet| {
            Self::scan_match(sheet, &bounds, text, Some(position))
                .or_else(|| Self::scan_match(sheet, &bounds, text, None))
        })
    }

    fn replace(&self, search: &str, replace: &str) -> Result<bool, EngineError> {
        let bounds = self.bounds;
        self.with_sheet_mut(|sheet| {
            let mut any = false;
            for (_, cell) in sheet
                .cells
                .iter_mut()
                .filter(|((row, col), _)| bounds.contains(*row, *col))
            {
                if cell_matches(cell, search) {
                    let rewritten = cell.value.display_text().replace(search, replace);
                    cell.value = CellValue::parse(&rewritten);
                    any = true;
                }
            }
            any
        })
    }

    fn sort(&self, key_column: u32, descending: bool, has_header: bool) -> Result<(), EngineError> {
        let bounds = self.bounds;
        let data_start = if has_header {
            bounds.start_row + 1
        } else {
            bounds.start_row
        };
        if data_start > bounds.end_row {
            return Ok(());
        }
        self.with_sheet_mut(|sheet| {
            let mut rows: Vec<Vec<Option<Cell>>> = Vec::new();
            for row in data_start..=bounds.end_row {
                let mut cells = Vec::with_capacity(bounds.column_count() as usize);
                for col in bounds.start_col..=bounds.end_col {
                    cells.push(sheet.cells.remove(&(row, col)));
                }
                rows.push(cells);
            }
            let key_offset = key_column
                .checked_sub(bounds.start_col)
                .map(|offset| offset as usize);
            let key_of = |row: &[Option<Cell>]| -> CellValue {
                key_offset
                    .and_then(|offset| row.get(offset))
                    .and_then(|cell| cell.as_ref())
                    .map(|cell| cell.value.clone())
                    .unwrap_or_default()
            };
            rows.sort_by(|a, b| compare_sort_keys(&key_of(a), &key_of(b), descending));
            for (offset, row) in rows.into_iter().enumerate() {
                let target = data_start + offset as u32;
                for (ci, cell) in row.into_iter().enumerate() {
                    if let Some(cell) = cell {
                        sheet
                            .cells
                            .insert((target, bounds.start_col + ci as u32), cell);
                    }
                }
            }
        })
    }

    fn copy(&self) -> Result<(), EngineError> {
        let bounds = self.bounds;
        let mut state = self.inner.write();
        let index = state.sheet_index(&self.sheet)?;
        let sheet = &state.sheets[index];
        let snapshot: Vec<Vec<Option<Cell>>> = (bounds.start_row..=bounds.end_row)
            .map(|row| {
                (bounds.start_col..=bounds.end_col)
                    .map(|col| sheet.cells.get(&(row, col)).cloned())
                    .collect()
            })
            .collect();
        state.clipboard = Some(snapshot);
        Ok(())
    }
}

fn sort_rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Number(_) => 0,
        CellValue::Text(_) => 1,
        CellValue::Bool(_) => 2,
        CellValue::Empty => 3,
    }
}

/// Empty cells sort last regardless of direction, matching the host
/// application's sort behavior.
fn compare_sort_keys(a: &CellValue, b: &CellValue, descending: bool) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let base = match (a, b) {
                (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
                (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
                (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
                _ => sort_rank(a).cmp(&sort_rank(b)),
            };
            if descending { base.reverse() } else { base }
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct WorkbookDoc {
    active_sheet: Option<String>,
    sheets: Vec<SheetDoc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SheetDoc {
    name: String,
    cells: BTreeMap<String, Cell>,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u32, f64>,
    merged: Vec<String>,
}
