use std::{fs, io::ErrorKind, path::PathBuf};

use tracing::{debug, warn};

use crate::{error::AppError, profile::Config};

/// Loads and saves the gitego configuration
pub trait ConfigStore {
    /// Loads the configuration, returning an empty one if nothing is stored yet
    fn load(&self) -> Result<Config, AppError>;
    /// Replaces the stored configuration
    fn save(&self, config: &Config) -> Result<(), AppError>;
}

/// Configuration kept as a JSON file in the gitego directory
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> Result<Config, AppError> {
        let file_contents: String = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, starting empty");
                return Ok(Config::default());
            }
            Err(err) => return Err(err.into()),
        };

        if file_contents.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config =
            serde_json::from_str(&file_contents).map_err(|source| AppError::ConfigParse {
                path: self.path.clone(),
                source,
            })?;
        warn_on_dangling_references(&config);
        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json: String = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json + "\n")?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

/// Warns about names that point at profiles which no longer exist
fn warn_on_dangling_references(config: &Config) {
    if !config.active_profile.is_empty() && !config.has_profile(&config.active_profile) {
        warn!(
            "active profile '{}' not found, it may have been deleted",
            config.active_profile
        );
    }

    for rule in config.dangling_rules() {
        warn!(
            "auto-switch rule for path '{}' points to a non-existent profile '{}'",
            rule.path, rule.profile
        );
    }
}
