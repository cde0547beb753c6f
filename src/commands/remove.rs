use std::io::{BufRead, Write};

use colored::Colorize;
use tracing::debug;

use crate::{
    commands::{Context, ask},
    error::AppError,
};

/// Result of a removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Cancelled,
}

/// Removes a profile with its rules, generated gitconfig and token.
///
/// Git-side cleanup runs first and only warns on failure, so the profile is
/// gone from the gitego config even when an include could not be removed.
pub fn remove_profile(
    ctx: &Context,
    profile_name: &str,
    force: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<RemoveOutcome, AppError> {
    let mut config = ctx.store.load()?;
    if !config.has_profile(profile_name) {
        return Err(AppError::ProfileNotFound(profile_name.to_string()));
    }

    if !force {
        let question = format!(
            "Are you sure you want to remove the profile '{profile_name}' and all its rules? This cannot be undone. [y/N]: "
        );
        if ask(&question, input, out)? != "y" {
            writeln!(out, "removal cancelled")?;
            return Ok(RemoveOutcome::Cancelled);
        }
    }

    if let Err(err) = ctx.editor.remove_include(profile_name, None) {
        writeln!(
            out,
            "{} failed to remove rules from {}: {err}",
            "warning:".yellow(),
            ctx.paths.git_config_file.display()
        )?;
    }
    if let Err(err) = ctx.editor.remove_profile_config(profile_name) {
        debug!(profile = profile_name, %err, "could not delete profile gitconfig");
    }

    let removed_rules = config.remove_rules_for(profile_name);
    config.profiles.remove(profile_name);
    if config.active_profile == profile_name {
        config.active_profile.clear();
    }
    ctx.store.save(&config)?;

    if let Err(err) = ctx.secrets.delete(profile_name) {
        debug!(profile = profile_name, %err, "could not delete token");
    }

    debug!(profile = profile_name, removed_rules, "profile removed");
    writeln!(
        out,
        "{} profile '{}' and all associated rules removed",
        "✓".green(),
        profile_name
    )?;
    Ok(RemoveOutcome::Removed)
}
