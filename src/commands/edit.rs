use colored::Colorize;
use tracing::debug;

use crate::{
    commands::{Context, add::non_empty},
    error::AppError,
    validation::{validate_email, validate_user_name},
};

/// Changes requested for an existing profile; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    /// An empty value clears the attribute
    pub username: Option<String>,
    pub ssh_key: Option<String>,
    pub signing_key: Option<String>,
    pub pat: Option<String>,
}

/// Updates the given fields of a profile
pub fn edit_profile(ctx: &Context, profile_name: &str, changes: ProfileChanges) -> Result<(), AppError> {
    let mut config = ctx.store.load()?;
    let profile = config
        .profiles
        .get_mut(profile_name)
        .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;

    if let Some(name) = changes.name {
        validate_user_name(&name)?;
        profile.name = name;
    }
    if let Some(email) = changes.email {
        validate_email(&email)?;
        profile.email = email;
    }
    if changes.username.is_some() {
        profile.username = non_empty(changes.username);
    }
    if changes.ssh_key.is_some() {
        profile.ssh_key = non_empty(changes.ssh_key);
    }
    if changes.signing_key.is_some() {
        profile.signing_key = non_empty(changes.signing_key);
    }

    let profile = profile.clone();
    ctx.store.save(&config)?;

    // Auto-rules include the generated file, so it has to follow the profile.
    if ctx.editor.has_profile_config(profile_name) {
        debug!(profile = profile_name, "refreshing profile gitconfig");
        if let Err(err) = ctx.editor.write_profile_config(profile_name, &profile) {
            println!(
                "{} profile updated, but its auto-switch gitconfig could not be refreshed: {err}",
                "warning:".yellow()
            );
        }
    }

    if let Some(pat) = changes.pat {
        let stored = match non_empty(Some(pat)) {
            Some(pat) => ctx.secrets.set(profile_name, &pat),
            None => ctx.secrets.delete(profile_name),
        };
        if let Err(err) = stored {
            println!(
                "{} profile updated, but failed to store the new token securely: {err}",
                "warning:".yellow()
            );
            return Ok(());
        }
    }

    println!("{} profile '{}' updated", "✓".green(), profile_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        secrets::SecretStore,
        testing::{TestEnv, work_profile},
    };
    use std::fs;

    #[test]
    fn test_only_given_fields_change() {
        let env = TestEnv::new();
        env.add_profile("work", work_profile());

        let changes = ProfileChanges {
            email: Some("jane@new-work.com".to_string()),
            ..ProfileChanges::default()
        };
        edit_profile(&env.ctx(), "work", changes).unwrap();

        let profile = &env.config().profiles["work"];
        assert_eq!(profile.email, "jane@new-work.com");
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.username.as_deref(), Some("ghuser"));
    }

    #[test]
    fn test_empty_value_clears_optional_attribute() {
        let env = TestEnv::new();
        env.add_profile("work", work_profile());

        let changes = ProfileChanges {
            username: Some(String::new()),
            ..ProfileChanges::default()
        };
        edit_profile(&env.ctx(), "work", changes).unwrap();
        assert_eq!(env.config().profiles["work"].username, None);
    }

    #[test]
    fn test_unknown_profile() {
        let env = TestEnv::new();
        let err = edit_profile(&env.ctx(), "ghost", ProfileChanges::default()).unwrap_err();
        assert!(matches!(err, AppError::ProfileNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_generated_gitconfig_is_refreshed() {
        let env = TestEnv::new();
        env.add_profile("work", work_profile());
        env.ctx()
            .editor
            .write_profile_config("work", &work_profile())
            .unwrap();

        let changes = ProfileChanges {
            ssh_key: Some("~/.ssh/id_work".to_string()),
            ..ProfileChanges::default()
        };
        edit_profile(&env.ctx(), "work", changes).unwrap();

        let generated = fs::read_to_string(env.paths.profile_config_file("work")).unwrap();
        assert!(generated.contains("sshCommand = ssh -i ~/.ssh/id_work"));
    }

    #[test]
    fn test_new_token_is_stored() {
        let env = TestEnv::new();
        env.add_profile("work", work_profile());
        let changes = ProfileChanges {
            pat: Some("tok456".to_string()),
            ..ProfileChanges::default()
        };
        edit_profile(&env.ctx(), "work", changes).unwrap();
        assert_eq!(env.secrets.tokens.borrow()["work"], "tok456");
    }

    #[test]
    fn test_empty_token_deletes_stored_one() {
        let env = TestEnv::new();
        env.add_profile("work", work_profile());
        env.secrets.set("work", "tok123").unwrap();

        let changes = ProfileChanges {
            pat: Some(String::new()),
            ..ProfileChanges::default()
        };
        edit_profile(&env.ctx(), "work", changes).unwrap();
        assert!(!env.secrets.tokens.borrow().contains_key("work"));
    }
}
