//! Wire-facing data model: cell values, match snapshots, the result envelope,
//! and the option bags carried by formatting and sort commands.

use crate::error::BridgeError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scalar cell value as it crosses the wire. JSON null maps to `Empty`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The text a cell shows, used for find/replace matching.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Re-ingest edited display text: numbers and booleans are recognized,
    /// everything else stays text, and "" becomes `Empty`.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(number) = text.parse::<f64>() {
            return CellValue::Number(number);
        }
        match text {
            "true" | "TRUE" => CellValue::Bool(true),
            "false" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(text.to_string()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => {
                CellValue::Number(n.as_f64().unwrap_or_default())
            }
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Snapshot of a found cell, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CellMatch {
    pub address: String,
    pub value: CellValue,
    pub row: u32,
    pub column: u32,
}

/// The universal response envelope. Command-specific payload fields are
/// flattened alongside `success`/`message`/`error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failed_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failed_error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Attach a payload field. Values that fail to serialize are dropped.
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json) = serde_json::to_value(value) {
            self.data.insert(key.into(), json);
        }
        self
    }

    /// Convert a failure into its envelope. Unknown-command and empty-input
    /// failures use the `message` field; everything else uses `error`.
    pub fn from_error(err: &BridgeError) -> Self {
        match err {
            BridgeError::UnknownFunction(_) | BridgeError::EmptyInput => {
                Self::failed_message(err.to_string())
            }
            _ => Self::failed_error(err.to_string()),
        }
    }
}

/// Worksheet identifier as callers send it: a name or a 1-based index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SheetIdentifier {
    Index(i64),
    Name(String),
}

/// Font attributes; only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FontOptions {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<u32>,
}

/// Alignment attributes, carried as the host application's numeric constants
/// (e.g. -4108 for centered).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AlignOptions {
    pub horizontal: Option<i64>,
    pub vertical: Option<i64>,
}

/// Border attributes, numeric line-style and weight constants plus a packed
/// color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderOptions {
    pub line_style: Option<i64>,
    pub weight: Option<i64>,
    pub color: Option<u32>,
}

/// Sort options: `key` is an address on the sorted sheet naming the key
/// column, `order` is 1 for ascending and 2 for descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
    pub key: String,
    #[serde(default = "default_sort_order")]
    pub order: i64,
    #[serde(default)]
    pub has_header: bool,
}

fn default_sort_order() -> i64 {
    1
}
