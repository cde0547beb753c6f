use colored::Colorize;

use crate::{
    commands::Context,
    error::AppError,
    profile::{Config, Profile},
    validation::{validate_email, validate_new_profile_name, validate_user_name},
};

/// Attributes of a profile being created
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    pub username: Option<String>,
    pub ssh_key: Option<String>,
    pub signing_key: Option<String>,
    pub pat: Option<String>,
}

/// Adds a new profile and stores its token, if any
pub fn add_profile(ctx: &Context, profile_name: &str, new: NewProfile) -> Result<(), AppError> {
    let mut config: Config = ctx.store.load()?;

    validate_new_profile_name(profile_name, &config)?;
    validate_user_name(&new.name)?;
    validate_email(&new.email)?;

    let profile = Profile {
        username: non_empty(new.username),
        ssh_key: non_empty(new.ssh_key),
        signing_key: non_empty(new.signing_key),
        ..Profile::new(new.name, new.email)
    };
    config.profiles.insert(profile_name.to_string(), profile);
    ctx.store.save(&config)?;

    if let Some(pat) = non_empty(new.pat) {
        if let Err(err) = ctx.secrets.set(profile_name, &pat) {
            println!(
                "{} profile saved, but failed to store the token securely: {err}",
                "warning:".yellow()
            );
            return Ok(());
        }
    }

    println!("{} profile '{}' added", "✓".green(), profile_name);
    Ok(())
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestEnv, work_profile};

    fn new_profile() -> NewProfile {
        NewProfile {
            name: "Jane Doe".to_string(),
            email: "jane@work.com".to_string(),
            username: Some("ghuser".to_string()),
            ..NewProfile::default()
        }
    }

    #[test]
    fn test_add_profile_saves_it() {
        let env = TestEnv::new();
        add_profile(&env.ctx(), "work", new_profile()).unwrap();

        let config = env.config();
        assert_eq!(config.profiles["work"].email, "jane@work.com");
        assert_eq!(config.profiles["work"].username.as_deref(), Some("ghuser"));
        assert_eq!(config.profiles["work"].ssh_key, None);
    }

    #[test]
    fn test_add_stores_token_outside_config() {
        let env = TestEnv::new();
        let new = NewProfile {
            pat: Some("tok123".to_string()),
            ..new_profile()
        };
        add_profile(&env.ctx(), "work", new).unwrap();

        assert_eq!(env.secrets.tokens.borrow().get("work").map(String::as_str), Some("tok123"));
        let json = serde_json::to_string(&env.config()).unwrap();
        assert!(!json.contains("tok123"));
    }

    #[test]
    fn test_add_existing_profile_fails_without_changes() {
        let env = TestEnv::new();
        env.add_profile("work", work_profile());

        let err = add_profile(&env.ctx(), "work", new_profile()).unwrap_err();
        assert!(matches!(err, AppError::ProfileExists(_)));
        assert_eq!(env.store.saves.get(), 0);
    }

    #[test]
    fn test_add_rejects_empty_email() {
        let env = TestEnv::new();
        let new = NewProfile {
            email: String::new(),
            ..new_profile()
        };
        assert!(matches!(
            add_profile(&env.ctx(), "work", new),
            Err(AppError::Validation(_))
        ));
        assert!(env.config().profiles.is_empty());
    }

    #[test]
    fn test_token_failure_still_keeps_profile() {
        let env = TestEnv::new();
        env.secrets.fail.set(true);
        let new = NewProfile {
            pat: Some("tok123".to_string()),
            ..new_profile()
        };
        add_profile(&env.ctx(), "work", new).unwrap();
        assert!(env.config().has_profile("work"));
    }
}
