//! `pathguard list` command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use pathguard_core::error::AppError;
use pathguard_entity::protection::ProtectionRecord;

use crate::output::{self, OutputFormat};

use super::{build_checker, load_config};

#[derive(Debug, Args)]
pub struct ListArgs {}

#[derive(Debug, Serialize, Tabled)]
struct ProtectionRow {
    id: i64,
    path: String,
    created_by: String,
    created_at: String,
    reason: String,
}

impl From<ProtectionRecord> for ProtectionRow {
    fn from(record: ProtectionRecord) -> Self {
        let created_at = record
            .created_at_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        Self {
            id: record.id,
            path: record.path,
            created_by: record.created_by,
            created_at,
            reason: record.reason.unwrap_or_default(),
        }
    }
}

pub async fn execute(
    _args: &ListArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = load_config(config_path)?;
    let checker = build_checker(&config).await?;

    let rows: Vec<ProtectionRow> = checker.list().await?.into_iter().map(Into::into).collect();
    output::print_list(&rows, format);
    Ok(())
}
