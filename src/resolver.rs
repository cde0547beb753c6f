//! Picks the profile that applies in a directory.
//!
//! The most specific auto-switch rule containing the directory wins; without a
//! matching rule the manually selected global default applies. Status display,
//! the credential helper and the commit guard all go through here so they
//! agree on the answer.

use std::path::Path;

use tracing::debug;

use crate::{
    normalize::{is_within, normalize},
    profile::{AutoRule, Config},
};

/// Outcome of resolving the active profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Selected profile name, empty when none could be determined
    pub profile: String,
    /// Human readable reason for the selection
    pub source: String,
}

impl Resolution {
    pub fn global_default(config: &Config) -> Self {
        let source = if config.active_profile.is_empty() {
            "no active profile"
        } else {
            "global default"
        };
        Self {
            profile: config.active_profile.clone(),
            source: source.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }
}

/// Resolves the active profile for `current_dir`
pub fn resolve_active_profile(config: &Config, current_dir: &Path, home: &Path) -> Resolution {
    let default = Resolution::global_default(config);
    if config.auto_rules.is_empty() {
        return default;
    }

    let current = match normalize(current_dir, home) {
        Ok(current) => current,
        Err(err) => {
            debug!(%err, "cannot normalize current directory, using global default");
            return default;
        }
    };

    match best_matching_rule(&config.auto_rules, &current, home) {
        Some(rule) => {
            debug!(rule_path = %rule.path, profile = %rule.profile, dir = %current, "auto-rule matched");
            Resolution {
                profile: rule.profile.clone(),
                source: format!("auto-rule for profile '{}'", rule.profile),
            }
        }
        None => default,
    }
}

/// Longest normalized rule path containing `current`; equal lengths keep the
/// earlier rule.
fn best_matching_rule<'a>(rules: &'a [AutoRule], current: &str, home: &Path) -> Option<&'a AutoRule> {
    let mut best: Option<(&AutoRule, usize)> = None;

    for rule in rules {
        let Ok(rule_path) = normalize(&rule.path, home) else {
            debug!(rule_path = %rule.path, "skipping rule with unusable path");
            continue;
        };

        if !is_within(current, &rule_path) {
            continue;
        }
        if best.is_none_or(|(_, best_len)| rule_path.len() > best_len) {
            best = Some((rule, rule_path.len()));
        }
    }

    best.map(|(rule, _)| rule)
}
