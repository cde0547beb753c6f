use std::path::PathBuf;

use crate::error::AppError;

/// gitego's own directory under the user's home
const GITEGO_DIR: &str = ".gitego";
/// Stored configuration file inside the gitego directory
const CONFIG_FILE: &str = "config.json";
/// Directory holding one generated gitconfig per profile
const PROFILES_DIR: &str = "profiles";
/// Global Git settings file in the user's home directory
const GLOBAL_GITCONFIG_FILE: &str = ".gitconfig";

/// Filesystem locations used by every command, computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub home: PathBuf,
    pub gitego_dir: PathBuf,
    pub config_file: PathBuf,
    pub profiles_dir: PathBuf,
    pub git_config_file: PathBuf,
}

impl AppPaths {
    /// Builds the paths from the current user's home directory
    pub fn from_home_dir() -> Result<Self, AppError> {
        let home: PathBuf = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
        Ok(Self::with_home(home))
    }

    /// Builds the paths rooted at an explicit home directory
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home: PathBuf = home.into();
        let gitego_dir = home.join(GITEGO_DIR);
        Self {
            config_file: gitego_dir.join(CONFIG_FILE),
            profiles_dir: gitego_dir.join(PROFILES_DIR),
            git_config_file: home.join(GLOBAL_GITCONFIG_FILE),
            gitego_dir,
            home,
        }
    }

    /// Path of the generated gitconfig for a profile
    pub fn profile_config_file(&self, profile_name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile_name}.gitconfig"))
    }
}
