//! `pathguard cache` command.

use clap::{Args, Subcommand};

use pathguard_core::error::AppError;

use crate::output;

use super::{build_checker, load_config};

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Flush every cached protection entry
    Clear,
}

pub async fn execute(args: &CacheArgs, config_path: &str) -> Result<(), AppError> {
    let config = load_config(config_path)?;
    let checker = build_checker(&config).await?;

    match args.command {
        CacheCommands::Clear => {
            checker.clear_cache().await;
            output::print_success("Protection cache cleared");
        }
    }
    Ok(())
}
