use colored::Colorize;

use crate::{commands::Context, error::AppError, resolver::Resolution};

/// What `gitego status` shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub name: String,
    pub email: String,
    pub resolution: Resolution,
}

/// Gathers the effective identity, or `None` outside a repository or
/// without a configured email
pub fn current_status(ctx: &Context) -> Result<Option<Status>, AppError> {
    let Ok(email) = ctx.git.get("user.email") else {
        return Ok(None);
    };
    let name = ctx.git.get("user.name").unwrap_or_default();

    let config = ctx.store.load()?;
    Ok(Some(Status {
        name,
        email,
        resolution: ctx.resolve(&config),
    }))
}

/// Displays the effective Git identity and why it applies
pub fn show_status(ctx: &Context) -> Result<(), AppError> {
    let Some(status) = current_status(ctx)? else {
        println!("{}", "Not inside a Git repository or user not configured.".yellow());
        return Ok(());
    };

    let expected = if status.resolution.is_empty() {
        "-".dimmed().to_string()
    } else {
        status.resolution.profile.cyan().to_string()
    };

    println!("{}", "--- Git Identity Status ---".blue());
    println!("  Name:    {}", status.name);
    println!("  Email:   {}", status.email);
    println!("  Profile: {expected}");
    println!("  Source:  {}", status.resolution.source);
    println!("{}", "---------------------------".blue());
    Ok(())
}
