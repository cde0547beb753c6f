use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Stored configuration could not be parsed
    #[error("could not parse config file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error talking to the OS secret store
    #[error("keychain error: {0}")]
    Keyring(#[from] keyring::Error),
    /// Error when executing Git commands
    #[error("git command failed: {0}")]
    GitCommand(String),
    /// Error when current directory is not a Git repository
    #[error("not in git repository")]
    NotInGitRepository,
    /// Error during input validation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when a profile name is not configured.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
    /// Error when a profile name is already taken.
    #[error("profile '{0}' already exists")]
    ProfileExists(String),
    /// Error when no auto-switch rule is registered for a path.
    #[error("no auto-switch rule registered for '{0}'")]
    RuleNotFound(String),
    /// Error when the home directory cannot be determined.
    #[error("failed to find the home directory")]
    HomeDirNotFound,
    /// Error during UTF-8 conversion.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl AppError {
    /// Corrective hint shown under the error line, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            AppError::ProfileNotFound(name) => Some(format!(
                "run 'gitego list' to see profiles, or 'gitego add {name} --name <name> --email <email>' to create it"
            )),
            AppError::ProfileExists(name) => Some(format!(
                "use 'gitego edit {name}' to modify it, or 'gitego rm {name}' to remove it"
            )),
            AppError::RuleNotFound(_) => {
                Some("run 'gitego status' inside the directory to see which rule applies".to_string())
            }
            AppError::NotInGitRepository => {
                Some("run this command inside a Git repository".to_string())
            }
            AppError::ConfigParse { .. } => {
                Some("fix or remove the file; gitego never rewrites a config it cannot read".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_not_found_has_hint() {
        let err = AppError::ProfileNotFound("work".to_string());
        assert_eq!(err.to_string(), "profile 'work' not found");
        assert!(err.hint().unwrap().contains("gitego add work"));
    }

    #[test]
    fn test_io_error_has_no_hint() {
        let err = AppError::from(std::io::Error::other("boom"));
        assert!(err.hint().is_none());
    }
}
