//! Worksheet resolution and range access.
//!
//! Sheet names resolve with an exact scan first, then a substring rescan in
//! the same workbook order, so a caller's prefix or partial name still lands
//! on a deterministic sheet (first occurrence wins) while a hopeless query
//! resolves to nothing instead of a guess.

use crate::engine::{EngineError, RangeHandle, SheetHandle, Workbook, Worksheet as _};
use crate::error::BridgeError;
use crate::model::SheetIdentifier;

/// How an operation names the worksheet it acts on.
pub enum SheetTarget {
    /// The workbook's active sheet.
    Active,
    /// A name, resolved exact-then-substring.
    Name(String),
    /// 1-based position in workbook order.
    Index(i64),
    /// An already-resolved handle, used when chaining operations against one
    /// sheet without re-resolving.
    Handle(SheetHandle),
}

impl SheetTarget {
    /// Target for an optional caller-supplied sheet name; empty counts as
    /// absent.
    pub fn from_context(name: Option<&str>) -> Self {
        match name {
            Some(name) if !name.is_empty() => SheetTarget::Name(name.to_string()),
            _ => SheetTarget::Active,
        }
    }
}

impl From<&SheetIdentifier> for SheetTarget {
    fn from(identifier: &SheetIdentifier) -> Self {
        match identifier {
            SheetIdentifier::Name(name) => SheetTarget::Name(name.clone()),
            SheetIdentifier::Index(index) => SheetTarget::Index(*index),
        }
    }
}

/// Resolve an optional sheet name to a handle.
///
/// No name returns the active sheet. Otherwise every sheet is scanned in
/// workbook order for an exact name match, then rescanned for the first sheet
/// whose name contains the query. `None` means no plausible match exists.
pub fn resolve_worksheet(workbook: &dyn Workbook, name: Option<&str>) -> Option<SheetHandle> {
    let query = match name {
        Some(query) if !query.is_empty() => query,
        _ => return Some(workbook.active_sheet()),
    };

    let count = workbook.sheet_count();
    for index in 0..count {
        if let Some(sheet) = workbook.sheet_at(index) {
            if sheet.name() == query {
                return Some(sheet);
            }
        }
    }
    for index in 0..count {
        if let Some(sheet) = workbook.sheet_at(index) {
            if sheet.name().contains(query) {
                tracing::debug!(query, matched = %sheet.name(), "substring sheet match");
                return Some(sheet);
            }
        }
    }
    tracing::debug!(query, "no worksheet matched");
    None
}

/// Resolve a [`SheetTarget`] to a handle, failing the enclosing command when
/// the target cannot be located.
pub fn resolve_sheet(
    workbook: &dyn Workbook,
    target: &SheetTarget,
) -> Result<SheetHandle, BridgeError> {
    match target {
        SheetTarget::Active => Ok(workbook.active_sheet()),
        SheetTarget::Name(name) => resolve_worksheet(workbook, Some(name))
            .ok_or_else(|| BridgeError::SheetNotFound(name.clone())),
        SheetTarget::Index(index) => {
            if *index < 1 {
                return Err(EngineError::SheetIndexOutOfBounds(*index).into());
            }
            workbook
                .sheet_at(*index as usize - 1)
                .ok_or_else(|| EngineError::SheetIndexOutOfBounds(*index).into())
        }
        SheetTarget::Handle(handle) => Ok(handle.clone()),
    }
}

/// Resolve an address on the targeted sheet. A fresh handle is produced per
/// call; nothing is cached, and address syntax is left to the engine.
pub fn resolve_range(
    workbook: &dyn Workbook,
    address: &str,
    target: &SheetTarget,
) -> Result<RangeHandle, BridgeError> {
    let sheet = resolve_sheet(workbook, target)?;
    Ok(sheet.range(address)?)
}
