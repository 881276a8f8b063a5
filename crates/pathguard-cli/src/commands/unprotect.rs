//! `pathguard unprotect` command.

use clap::Args;
use dialoguer::Confirm;

use pathguard_core::error::AppError;

use crate::output;

use super::{build_checker, load_config};

#[derive(Debug, Args)]
pub struct UnprotectArgs {
    /// Path or numeric record id to unprotect
    pub target: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn execute(args: &UnprotectArgs, config_path: &str) -> Result<(), AppError> {
    let config = load_config(config_path)?;
    let checker = build_checker(&config).await?;

    // A purely numeric target is treated as a record id.
    if let Ok(id) = args.target.parse::<i64>() {
        let path = checker
            .path_for_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No protection with id {id}")))?;

        if !confirm(args.yes, &format!("Remove protection from '{path}' (id {id})?"))? {
            output::print_error("Aborted");
            return Ok(());
        }

        checker.unprotect_by_id(id).await?;
        output::print_success(&format!("Unprotected {path}"));
        return Ok(());
    }

    if !confirm(args.yes, &format!("Remove protection from '{}'?", args.target))? {
        output::print_error("Aborted");
        return Ok(());
    }

    checker.unprotect_by_path(&args.target).await?;
    output::print_success(&format!("Unprotected {}", args.target));
    Ok(())
}

fn confirm(skip: bool, prompt: &str) -> Result<bool, AppError> {
    if skip {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))
}
