use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Represents a Git identity stored in the gitego config.
///
/// The personal access token of a profile lives only in the secret store,
/// so it has no field here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    /// Git user name (user.name)
    pub name: String,
    /// Git email address (user.email)
    pub email: String,
    /// Login handle used by the credential helper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Path to the private SSH key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    /// Commit signing key identifier (user.signingkey)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_key: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// `core.sshCommand` value for this profile's SSH key
    pub fn ssh_command(&self) -> Option<String> {
        self.ssh_key.as_deref().map(|key| format!("ssh -i {key}"))
    }
}

/// Binds a directory to the profile that should be used inside it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AutoRule {
    pub path: String,
    pub profile: String,
}

/// The whole gitego configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auto_rules: Vec<AutoRule>,
    /// Manually selected global default, empty when unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub active_profile: String,
}

impl Config {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Rules whose profile is not configured
    pub fn dangling_rules(&self) -> impl Iterator<Item = &AutoRule> {
        self.auto_rules
            .iter()
            .filter(|rule| !self.profiles.contains_key(&rule.profile))
    }

    /// Drops every rule bound to `profile_name`, returning how many were removed
    pub fn remove_rules_for(&mut self, profile_name: &str) -> usize {
        let before = self.auto_rules.len();
        self.auto_rules.retain(|rule| rule.profile != profile_name);
        before - self.auto_rules.len()
    }
}
