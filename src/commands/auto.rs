//! Registration and removal of directory auto-switch rules.

use colored::Colorize;
use tracing::debug;

use crate::{
    commands::Context,
    error::AppError,
    gitconfig::IncludeChange,
    normalize::normalize,
    profile::AutoRule,
};

/// Result of registering a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Added,
    AlreadyExists,
}

/// Makes `profile_name` the identity for repositories under `raw_path`.
///
/// The profile gitconfig and the global include are written first; the rule
/// is only recorded once both exist. If saving the rule fails afterwards the
/// Git side is already live and a warning is printed.
pub fn register_rule(ctx: &Context, raw_path: &str, profile_name: &str) -> Result<RuleOutcome, AppError> {
    let mut config = ctx.store.load()?;
    let profile = config
        .profile(profile_name)
        .cloned()
        .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;

    let dir = normalize(raw_path, &ctx.paths.home)?;

    let exists = config.auto_rules.iter().any(|rule| {
        rule.profile == profile_name
            && normalize(&rule.path, &ctx.paths.home).is_ok_and(|path| path == dir)
    });
    if exists {
        println!(
            "{} auto-switch rule for profile '{}' on path '{}' already exists",
            "✓".green(),
            profile_name,
            dir
        );
        return Ok(RuleOutcome::AlreadyExists);
    }

    println!("setting up auto-switch rule for profile '{profile_name}'...");

    ctx.editor.write_profile_config(profile_name, &profile)?;
    match ctx.editor.add_include(&dir, profile_name)? {
        IncludeChange::Added => println!(
            "{} added include for '{}' to {}",
            "✓".green(),
            dir,
            ctx.paths.git_config_file.display()
        ),
        IncludeChange::AlreadyPresent => debug!(dir = %dir, "include already present"),
    }

    config.auto_rules.push(AutoRule {
        path: dir,
        profile: profile_name.to_string(),
    });
    if let Err(err) = ctx.store.save(&config) {
        println!(
            "{} git config updated, but failed to save the rule to the gitego config: {err}",
            "warning:".yellow()
        );
        return Ok(RuleOutcome::Added);
    }

    println!("{} rule setup complete", "✓".green());
    Ok(RuleOutcome::Added)
}

/// Removes every rule registered for `raw_path`.
///
/// Returns the profiles whose rules were removed.
pub fn deregister_rule(ctx: &Context, raw_path: &str) -> Result<Vec<String>, AppError> {
    let mut config = ctx.store.load()?;
    let dir = normalize(raw_path, &ctx.paths.home)?;

    let (removed, kept): (Vec<AutoRule>, Vec<AutoRule>) = config
        .auto_rules
        .drain(..)
        .partition(|rule| normalize(&rule.path, &ctx.paths.home).is_ok_and(|path| path == dir));
    config.auto_rules = kept;

    if removed.is_empty() {
        return Err(AppError::RuleNotFound(dir));
    }

    let mut profiles: Vec<String> = Vec::new();
    for rule in removed {
        // The include carries the path as written at registration, which can
        // differ from today's normalization once symlinks change.
        let result = ctx
            .editor
            .remove_include(&rule.profile, Some(&rule.path))
            .and_then(|count| match count {
                0 if rule.path != dir => ctx.editor.remove_include(&rule.profile, Some(&dir)),
                count => Ok(count),
            });
        match result {
            Ok(0) => println!(
                "{} no include for '{}' found in {}",
                "warning:".yellow(),
                rule.path,
                ctx.paths.git_config_file.display()
            ),
            Ok(_) => {}
            Err(err) => println!(
                "{} failed to remove the include for '{}' from {}: {err}",
                "warning:".yellow(),
                rule.path,
                ctx.paths.git_config_file.display()
            ),
        }
        if !profiles.contains(&rule.profile) {
            profiles.push(rule.profile);
        }
    }

    for profile_name in &profiles {
        let still_used = config.auto_rules.iter().any(|rule| &rule.profile == profile_name);
        if !still_used {
            if let Err(err) = ctx.editor.remove_profile_config(profile_name) {
                debug!(profile = %profile_name, %err, "could not delete profile gitconfig");
            }
        }
    }

    ctx.store.save(&config)?;
    println!("{} removed auto-switch rule for '{}'", "✓".green(), dir);
    Ok(profiles)
}
