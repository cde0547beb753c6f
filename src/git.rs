use std::process::{Command, Output};

use tracing::debug;

use crate::error::AppError;

/// Exit status `git config --unset` uses when the key is not set
const GIT_CONFIG_KEY_NOT_SET: i32 = 5;

/// Access to Git's own settings
pub trait GitSettings {
    /// Effective value of `key`, resolved local over global over system
    fn get(&self, key: &str) -> Result<String, AppError>;
    /// Writes `key` to the user's global settings
    fn set_global(&self, key: &str, value: &str) -> Result<(), AppError>;
    /// Removes `key` from the user's global settings; an unset key is not an error
    fn unset_global(&self, key: &str) -> Result<(), AppError>;
}

/// Settings accessor backed by the `git` executable
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl GitCli {
    fn run(args: &[&str]) -> Result<Output, AppError> {
        debug!(?args, "running git");
        Ok(Command::new("git").args(args).output()?)
    }

    fn failure(output: Output) -> Result<AppError, AppError> {
        let stderr = String::from_utf8(output.stderr)?.trim().to_string();
        if stderr.is_empty() {
            Ok(AppError::GitCommand(format!("git exited with {}", output.status)))
        } else {
            Ok(AppError::GitCommand(stderr))
        }
    }
}

impl GitSettings for GitCli {
    /// Executes Git config get command
    ///
    /// # Arguments
    /// * `key` - Git config key (user.name or user.email)
    fn get(&self, key: &str) -> Result<String, AppError> {
        let git_command_output: Output = Self::run(&["config", "--get", key])?;

        if !git_command_output.status.success() {
            return Err(Self::failure(git_command_output)?);
        }

        let value = String::from_utf8_lossy(&git_command_output.stdout)
            .trim()
            .to_string();
        Ok(value)
    }

    /// Executes a Git config set command on the global scope
    ///
    /// # Arguments
    /// * `key` - Git config key to set
    /// * `value` - Value to set for key
    fn set_global(&self, key: &str, value: &str) -> Result<(), AppError> {
        let git_command_output: Output = Self::run(&["config", "--global", key, value])?;

        if !git_command_output.status.success() {
            return Err(Self::failure(git_command_output)?);
        }

        Ok(())
    }

    fn unset_global(&self, key: &str) -> Result<(), AppError> {
        let git_command_output: Output = Self::run(&["config", "--global", "--unset", key])?;

        match git_command_output.status.code() {
            Some(0) | Some(GIT_CONFIG_KEY_NOT_SET) => Ok(()),
            _ => Err(Self::failure(git_command_output)?),
        }
    }
}
