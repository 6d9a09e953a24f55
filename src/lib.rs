//! sheet-bridge: a dispatch facade over a spreadsheet application's object
//! model.
//!
//! A remote caller supplies a function name and a parameter bag; the facade
//! maps the name onto one of a closed set of workbook operations (cell
//! read/write, formatting, row/column manipulation, find/replace, sort,
//! copy/paste, merge, worksheet lifecycle) and answers with a uniform
//! `{success, message|error, ...}` envelope. The object model itself is an
//! external capability surface behind the [`engine`] traits; nothing is
//! cached across calls, and no failure escapes the entry point.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod entry;
pub mod error;
pub mod logging;
pub mod model;
pub mod ops;
pub mod resolve;
pub mod utils;

pub use config::{BridgeConfig, CliArgs};
pub use dispatch::{CommandKind, command_catalog, dispatch};
pub use entry::{InvocationContext, run};
pub use error::BridgeError;
pub use logging::{LoggingConfig, init_logging};
