//! Command handlers
//!
//! Every handler receives a [`Context`] holding the paths and collaborators it
//! may touch, so tests can swap any of them.

pub mod add;
pub mod auto;
pub mod check_commit;
pub mod completion;
pub mod credential;
pub mod edit;
pub mod install_hook;
pub mod list;
pub mod remove;
pub mod status;
pub mod use_profile;

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use crate::{
    error::AppError,
    git::GitSettings,
    gitconfig::GitConfigEditor,
    paths::AppPaths,
    profile::Config,
    resolver::{Resolution, resolve_active_profile},
    secrets::{CredentialCache, SecretStore},
    storage::ConfigStore,
};

/// Paths and collaborators shared by all commands of one invocation
pub struct Context<'a> {
    pub paths: &'a AppPaths,
    /// Working directory of the process, `None` if it could not be read
    pub current_dir: Option<PathBuf>,
    pub store: &'a dyn ConfigStore,
    pub git: &'a dyn GitSettings,
    pub secrets: &'a dyn SecretStore,
    pub credential_cache: &'a dyn CredentialCache,
    pub editor: &'a dyn GitConfigEditor,
}

impl Context<'_> {
    /// Profile that applies in the current directory
    pub fn resolve(&self, config: &Config) -> Resolution {
        match &self.current_dir {
            Some(dir) => resolve_active_profile(config, dir, &self.paths.home),
            None => Resolution::global_default(config),
        }
    }
}

/// Prints `question` and reads one answer line, trimmed and lower-cased.
///
/// End of input reads as an empty answer.
pub fn ask(question: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<String, AppError> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}
