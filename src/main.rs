use anyhow::{Context, Result};
use clap::Parser;
use sheet_bridge::engine::memory::MemoryEngine;
use sheet_bridge::{
    BridgeConfig, CliArgs, InvocationContext, LoggingConfig, command_catalog, init_logging, ops,
};
use std::io::Read;

fn main() -> Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    let config = BridgeConfig::from_args(cli)?;

    if config.list_functions {
        let mut catalog = serde_json::Map::new();
        for (name, schema) in command_catalog() {
            catalog.insert(name, serde_json::to_value(schema)?);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(catalog))?
        );
        return Ok(());
    }

    let raw = match config.request.as_ref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("unable to read request {:?}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("unable to read request from stdin")?;
            buffer
        }
    };
    let mut context: InvocationContext =
        serde_json::from_str(&raw).context("request is not a valid invocation context")?;
    if config.active_sheet.is_some() {
        context.active_sheet = config.active_sheet.clone();
    }

    let workbook = match config.workbook.as_ref() {
        Some(path) => MemoryEngine::load(path)?,
        None => MemoryEngine::new(),
    };

    let results = sheet_bridge::run(&workbook, &context);

    if config.save {
        ops::save_workbook(&workbook)?;
    }

    let rendered = if config.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{}", rendered);
    Ok(())
}
