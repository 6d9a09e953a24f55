//! CLI arguments and their validated runtime configuration.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sheet-bridge",
    about = "Dispatch spreadsheet commands from a JSON request onto a workbook"
)]
pub struct CliArgs {
    /// Request JSON file; reads stdin when omitted
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Workbook seed file (JSON); starts blank when omitted
    #[arg(long, value_name = "FILE", env = "SHEET_BRIDGE_WORKBOOK")]
    pub workbook: Option<PathBuf>,

    /// Override the request's active sheet name
    #[arg(long)]
    pub active_sheet: Option<String>,

    /// Write the workbook back to its seed file after the request
    #[arg(long)]
    pub save: bool,

    /// Pretty-print the result array
    #[arg(long)]
    pub pretty: bool,

    /// Print the supported command set with parameter schemas and exit
    #[arg(long)]
    pub list_functions: bool,
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub request: Option<PathBuf>,
    pub workbook: Option<PathBuf>,
    pub active_sheet: Option<String>,
    pub save: bool,
    pub pretty: bool,
    pub list_functions: bool,
}

impl BridgeConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            request,
            workbook,
            active_sheet,
            save,
            pretty,
            list_functions,
        } = args;

        if let Some(path) = request.as_ref() {
            anyhow::ensure!(path.exists(), "request file {:?} does not exist", path);
            anyhow::ensure!(path.is_file(), "request path {:?} is not a file", path);
        }
        if let Some(path) = workbook.as_ref() {
            anyhow::ensure!(path.exists(), "workbook file {:?} does not exist", path);
            anyhow::ensure!(path.is_file(), "workbook path {:?} is not a file", path);
        }
        anyhow::ensure!(
            !save || workbook.is_some(),
            "--save requires a --workbook seed file to write back to"
        );

        Ok(Self {
            request,
            workbook,
            active_sheet,
            save,
            pretty,
            list_functions,
        })
    }
}
