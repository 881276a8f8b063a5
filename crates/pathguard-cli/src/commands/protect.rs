//! `pathguard protect` command.

use clap::Args;

use pathguard_core::error::AppError;
use pathguard_entity::protection::CreateProtection;

use crate::output;

use super::{build_checker, load_config};

#[derive(Debug, Args)]
pub struct ProtectArgs {
    /// Path to protect
    pub path: String,

    /// Scope the protection to a user
    #[arg(long)]
    pub user: Option<String>,

    /// Reason shown to users when an operation is denied
    #[arg(long)]
    pub reason: Option<String>,
}

pub async fn execute(args: &ProtectArgs, config_path: &str) -> Result<(), AppError> {
    let config = load_config(config_path)?;
    let checker = build_checker(&config).await?;

    let record = checker
        .protect(CreateProtection {
            path: args.path.clone(),
            file_id: None,
            user_id: args.user.clone(),
            created_by: whoami(),
            reason: args.reason.clone(),
        })
        .await?;

    output::print_success(&format!("Protected {}", record.path));
    output::print_kv("id", &record.id.to_string());
    if let Some(reason) = &record.reason {
        output::print_kv("reason", reason);
    }
    Ok(())
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "cli".to_string())
}
