//! CLI command definitions and dispatch.

pub mod cache;
pub mod check;
pub mod list;
pub mod protect;
pub mod unprotect;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use pathguard_cache::CacheManager;
use pathguard_core::config::AppConfig;
use pathguard_core::error::AppError;
use pathguard_database::connection::DatabasePool;
use pathguard_database::repositories::protection::ProtectionRepository;
use pathguard_engine::checker::ProtectionChecker;

use crate::output::OutputFormat;

/// PathGuard protected folder administration
#[derive(Debug, Parser)]
#[command(name = "pathguard", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Protect a folder
    Protect(protect::ProtectArgs),
    /// Remove a protection by path or id
    Unprotect(unprotect::UnprotectArgs),
    /// List protected folders
    List(list::ListArgs),
    /// Check a path's protection state
    Check(check::CheckArgs),
    /// Protection cache management
    Cache(cache::CacheArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Protect(args) => protect::execute(args, &self.config).await,
            Commands::Unprotect(args) => unprotect::execute(args, &self.config).await,
            Commands::List(args) => list::execute(args, &self.config, self.format).await,
            Commands::Check(args) => check::execute(args, &self.config).await,
            Commands::Cache(args) => cache::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, None)
}

/// Helper: build the protection checker against the configured store
/// and cache.
pub async fn build_checker(config: &AppConfig) -> Result<ProtectionChecker, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    let store = Arc::new(ProtectionRepository::new(pool.into_pool()));
    let cache = Arc::new(CacheManager::new(&config.cache).await?);
    Ok(ProtectionChecker::new(store, cache, config.protection.clone()))
}
