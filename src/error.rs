//! Error taxonomy for the dispatch facade.
//!
//! Every operation returns `Result<_, BridgeError>`; the dispatcher converts
//! each `Err` into a `success:false` envelope, so no error crosses the entry
//! point. Unknown-command and empty-input failures surface through the
//! envelope `message` field, everything else through `error`.

use crate::engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A worksheet name failed both exact and substring resolution.
    #[error("worksheet not found: {0}")]
    SheetNotFound(String),

    /// The command name is outside the closed command set.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The bulk-write matrix had no rows, or its first row was not an array.
    #[error("empty data")]
    EmptyInput,

    /// The parameter bag could not be deserialized for the named command.
    #[error("invalid parameters for {function}: {message}")]
    InvalidParams { function: String, message: String },

    /// Failure raised by the underlying spreadsheet object model.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl BridgeError {
    /// Coarse error class, used as a structured logging field.
    pub fn category(&self) -> &'static str {
        match self {
            BridgeError::SheetNotFound(_) => "resolution",
            BridgeError::UnknownFunction(_) => "unknown_command",
            BridgeError::EmptyInput => "empty_input",
            BridgeError::InvalidParams { .. } => "invalid_params",
            BridgeError::Engine(_) => "engine",
        }
    }
}
