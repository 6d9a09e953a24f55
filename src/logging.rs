//! Structured logging setup.
//!
//! JSON output for production environments, pretty output for development,
//! with an optional rotating file target. Diagnostics default to stderr so
//! the result JSON on stdout stays machine-readable.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub output: LogOutput,
    /// Directory for log files when output is `File`.
    pub log_dir: PathBuf,
    pub log_file_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production" || environment == "prod";

        Self {
            format: if is_production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            output: LogOutput::Stderr,
            log_dir: PathBuf::from("logs"),
            log_file_prefix: "sheet-bridge".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(format) = env::var("SHEET_BRIDGE_LOG_FORMAT") {
            match format.as_str() {
                "json" => config.format = LogFormat::Json,
                "pretty" => config.format = LogFormat::Pretty,
                _ => {}
            }
        }
        if let Ok(output) = env::var("SHEET_BRIDGE_LOG_OUTPUT") {
            match output.as_str() {
                "stdout" => config.output = LogOutput::Stdout,
                "stderr" => config.output = LogOutput::Stderr,
                "file" => config.output = LogOutput::File,
                _ => {}
            }
        }
        if let Ok(dir) = env::var("SHEET_BRIDGE_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        config
    }
}

/// Initialize the global subscriber. The returned guard must be held for the
/// process lifetime when logging to a file, or buffered lines are lost.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match config.output {
        LogOutput::Stdout => (BoxMakeWriter::new(io::stdout), None),
        LogOutput::Stderr => (BoxMakeWriter::new(io::stderr), None),
        LogOutput::File => {
            fs::create_dir_all(&config.log_dir).with_context(|| {
                format!("unable to create log directory {:?}", config.log_dir)
            })?;
            let appender =
                tracing_appender::rolling::daily(&config.log_dir, &config.log_file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
    };

    let layer = match config.format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(guard)
}
