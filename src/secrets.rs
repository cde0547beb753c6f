//! Secret storage for personal access tokens.
//!
//! Tokens never touch the config file. gitego keeps its own vault in the OS
//! keychain, keyed by profile name, and can additionally push the active
//! token into the slot Git's platform credential helper reads.

use keyring::Entry;
use tracing::debug;

use crate::error::AppError;

/// Keychain service name for gitego's token vault
const GITEGO_KEYRING_SERVICE: &str = "gitego";

/// Token vault keyed by profile name
pub trait SecretStore {
    fn get(&self, profile_name: &str) -> Result<Option<String>, AppError>;
    fn set(&self, profile_name: &str, token: &str) -> Result<(), AppError>;
    /// Deletes the token; a missing token is not an error
    fn delete(&self, profile_name: &str) -> Result<(), AppError>;
}

/// Vault in the OS keychain
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: GITEGO_KEYRING_SERVICE.to_string(),
        }
    }

    fn entry(&self, profile_name: &str) -> Result<Entry, AppError> {
        Ok(Entry::new(&self.service, profile_name)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, profile_name: &str) -> Result<Option<String>, AppError> {
        match self.entry(profile_name)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, profile_name: &str, token: &str) -> Result<(), AppError> {
        self.entry(profile_name)?.set_password(token)?;
        debug!(profile = profile_name, "stored token");
        Ok(())
    }

    fn delete(&self, profile_name: &str) -> Result<(), AppError> {
        match self.entry(profile_name)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// The credential slot Git's own platform helper reads
pub trait CredentialCache {
    fn store(&self, username: &str, token: &str) -> Result<(), AppError>;
}

/// Picks the credential cache for the platform gitego was built for
pub fn platform_credential_cache() -> Box<dyn CredentialCache> {
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::KeychainInternetPassword)
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(KeyringGitCredential)
    }
}

/// Writes the token where keyring-backed Git helpers look for github.com
#[cfg(not(target_os = "macos"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringGitCredential;

#[cfg(not(target_os = "macos"))]
impl CredentialCache for KeyringGitCredential {
    fn store(&self, _username: &str, token: &str) -> Result<(), AppError> {
        Entry::new("git", "https://github.com")?.set_password(token)?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use std::process::Command;

    use super::CredentialCache;
    use crate::error::AppError;

    /// Overwrites the internet password `git-credential-osxkeychain` reads
    #[derive(Debug, Default, Clone, Copy)]
    pub struct KeychainInternetPassword;

    impl CredentialCache for KeychainInternetPassword {
        fn store(&self, username: &str, token: &str) -> Result<(), AppError> {
            // Absent entry makes this fail, which is fine.
            let _ = Command::new("security")
                .args(["delete-internet-password", "-a", username, "-s", "github.com"])
                .output();

            let output = Command::new("security")
                .args([
                    "add-internet-password",
                    "-a",
                    username,
                    "-s",
                    "github.com",
                    "-r",
                    "htps",
                    "-P",
                    "443",
                    "-w",
                    token,
                ])
                .output()?;

            if !output.status.success() {
                return Err(std::io::Error::other(format!(
                    "'security' failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ))
                .into());
            }
            Ok(())
        }
    }
}
