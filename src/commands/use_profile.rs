use colored::Colorize;
use tracing::debug;

use crate::{commands::Context, error::AppError, git::GitSettings, profile::Profile};

/// Makes a profile the global default.
///
/// Global Git settings are written first, then the choice is saved, then the
/// token is pushed into the platform credential slot when the profile has one.
pub fn use_profile(ctx: &Context, profile_name: &str) -> Result<(), AppError> {
    let mut config = ctx.store.load()?;
    let profile = config
        .profile(profile_name)
        .cloned()
        .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;

    apply_git_settings(ctx.git, &profile)?;

    config.active_profile = profile_name.to_string();
    ctx.store.save(&config)?;

    if let Some(username) = &profile.username {
        match ctx.secrets.get(profile_name) {
            Ok(Some(token)) if !token.is_empty() => {
                if let Err(err) = ctx.credential_cache.store(username, &token) {
                    println!(
                        "{} failed to pre-set the credential for '{}': {err}",
                        "warning:".yellow(),
                        username
                    );
                }
            }
            Ok(_) => debug!(profile = profile_name, "no token stored"),
            Err(err) => debug!(profile = profile_name, %err, "token lookup failed"),
        }
    }

    println!("{} set active profile to '{}'", "✓".green(), profile_name);
    Ok(())
}

/// Writes a profile's identity to the global Git settings, unsetting the
/// optional keys the profile does not define
pub fn apply_git_settings(git: &dyn GitSettings, profile: &Profile) -> Result<(), AppError> {
    git.set_global("user.name", &profile.name)?;
    git.set_global("user.email", &profile.email)?;

    match &profile.signing_key {
        Some(signing_key) => git.set_global("user.signingkey", signing_key)?,
        None => git.unset_global("user.signingkey")?,
    }
    match profile.ssh_command() {
        Some(ssh_command) => git.set_global("core.sshCommand", &ssh_command)?,
        None => git.unset_global("core.sshCommand")?,
    }
    Ok(())
}
