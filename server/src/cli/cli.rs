// server/src/cli/cli.rs

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use lib::{load_storage_config_from_yaml, Database};
use log::info;

use crate::cli::commands::CliArgs;
use crate::cli::handlers::handle_command;

/// CLI entry point: parse arguments, open the configured store, run one
/// command.
pub async fn start_cli() -> Result<()> {
    let args = CliArgs::parse();

    let config = load_storage_config_from_yaml(args.config.as_deref())
        .context("Failed to load storage configuration")?;
    info!(
        "Using {} storage in {:?}",
        config.storage_engine_type, config.data_directory
    );
    let db = Database::new(&config).context("Failed to open the record store")?;

    let mut stdout = io::stdout().lock();
    handle_command(&db, args.command, &mut stdout).await?;
    db.flush().await?;
    Ok(())
}
