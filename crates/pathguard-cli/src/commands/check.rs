//! `pathguard check` command.

use clap::Args;

use pathguard_core::error::AppError;

use crate::output;

use super::{build_checker, load_config};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to check
    pub path: String,
}

pub async fn execute(args: &CheckArgs, config_path: &str) -> Result<(), AppError> {
    let config = load_config(config_path)?;
    let checker = build_checker(&config).await?;

    if checker.is_protected(&args.path).await? {
        println!("protected");
        if let Some(record) = checker.protection_info(&args.path).await? {
            if let Some(reason) = &record.reason {
                output::print_kv("reason", reason);
            }
            output::print_kv("created_by", &record.created_by);
        }
    } else if checker.is_protected_or_parent_protected(&args.path).await? {
        println!("parent-protected");
    } else {
        println!("clear");
    }
    Ok(())
}
