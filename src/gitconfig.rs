//! Editing of gitego's entries in Git settings files.
//!
//! Each profile with auto-switch rules gets a generated gitconfig under
//! `~/.gitego/profiles/`, and the global `~/.gitconfig` gains one
//! conditional include per rule:
//!
//! ```text
//! # gitego auto-switch rule
//! [includeIf "gitdir:/home/u/work/"]
//!     path = /home/u/.gitego/profiles/work.gitconfig
//! ```
//!
//! The global file is not parsed as full gitconfig. It is split into
//! sections that keep their lines verbatim, so sections gitego does not own
//! are written back byte for byte.

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::Path,
};

use tracing::debug;

use crate::{error::AppError, paths::AppPaths, profile::Profile};

/// Comment line written above every include gitego adds
pub const RULE_MARKER: &str = "# gitego auto-switch rule";

/// Result of asking for a conditional include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeChange {
    Added,
    AlreadyPresent,
}

/// Edits the Git settings files gitego manages
pub trait GitConfigEditor {
    /// Writes the profile's generated gitconfig, replacing any previous one
    fn write_profile_config(&self, profile_name: &str, profile: &Profile) -> Result<(), AppError>;
    fn has_profile_config(&self, profile_name: &str) -> bool;
    /// Deletes the generated gitconfig; a missing file is not an error
    fn remove_profile_config(&self, profile_name: &str) -> Result<(), AppError>;
    /// Adds an include of the profile's gitconfig for repositories under `dir`
    fn add_include(&self, dir: &str, profile_name: &str) -> Result<IncludeChange, AppError>;
    /// Removes the profile's includes, only those for `dir` when given.
    /// Returns how many were removed.
    fn remove_include(&self, profile_name: &str, dir: Option<&str>) -> Result<usize, AppError>;
}

/// Editor working on the real files under the user's home
#[derive(Debug, Clone)]
pub struct FsGitConfigEditor {
    paths: AppPaths,
}

impl FsGitConfigEditor {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }

    /// Profile gitconfig path as it appears inside the global file
    fn include_target(&self, profile_name: &str) -> String {
        to_slash(&self.paths.profile_config_file(profile_name))
    }

    fn read_global(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(&self.paths.git_config_file) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl GitConfigEditor for FsGitConfigEditor {
    fn write_profile_config(&self, profile_name: &str, profile: &Profile) -> Result<(), AppError> {
        fs::create_dir_all(&self.paths.profiles_dir)?;
        let file_path = self.paths.profile_config_file(profile_name);
        fs::write(&file_path, render_profile_config(profile))?;
        debug!(path = %file_path.display(), "wrote profile gitconfig");
        Ok(())
    }

    fn has_profile_config(&self, profile_name: &str) -> bool {
        self.paths.profile_config_file(profile_name).is_file()
    }

    fn remove_profile_config(&self, profile_name: &str) -> Result<(), AppError> {
        match fs::remove_file(self.paths.profile_config_file(profile_name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn add_include(&self, dir: &str, profile_name: &str) -> Result<IncludeChange, AppError> {
        let target = self.include_target(profile_name);

        if let Some(content) = self.read_global()? {
            let document = GitConfigDocument::parse(&content);
            if document.has_include(&target, Some(dir)) {
                return Ok(IncludeChange::AlreadyPresent);
            }
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.paths.git_config_file)?;
        file.write_all(render_include(dir, &target).as_bytes())?;
        debug!(dir, target = %target, "added includeIf");
        Ok(IncludeChange::Added)
    }

    fn remove_include(&self, profile_name: &str, dir: Option<&str>) -> Result<usize, AppError> {
        let Some(content) = self.read_global()? else {
            return Ok(0);
        };

        let mut document = GitConfigDocument::parse(&content);
        let removed = document.remove_includes(&self.include_target(profile_name), dir);
        if removed > 0 {
            fs::write(&self.paths.git_config_file, document.render())?;
            debug!(removed, profile = profile_name, "removed includeIf");
        }
        Ok(removed)
    }
}

/// Contents of a profile's generated gitconfig
pub fn render_profile_config(profile: &Profile) -> String {
    let mut content = format!(
        "[user]\n    name = {}\n    email = {}\n",
        profile.name, profile.email
    );
    if let Some(signing_key) = &profile.signing_key {
        content.push_str(&format!("    signingkey = {signing_key}\n"));
    }
    if let Some(ssh_command) = profile.ssh_command() {
        content.push_str(&format!("\n[core]\n    sshCommand = {ssh_command}\n"));
    }
    content
}

/// Text appended to the global file for one include
fn render_include(dir: &str, target: &str) -> String {
    format!("\n{RULE_MARKER}\n[includeIf \"gitdir:{dir}\"]\n    path = {target}\n")
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// One `[section]` of a gitconfig file, lines kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// Comment and blank lines directly above the header
    leading: Vec<String>,
    /// `None` for the lines before the first header
    header: Option<String>,
    body: Vec<String>,
}

impl Section {
    fn is_include_of(&self, target: &str, dir: Option<&str>) -> bool {
        let Some(header) = &self.header else {
            return false;
        };
        if !header.trim().starts_with("[includeIf") {
            return false;
        }
        if let Some(dir) = dir {
            if !header.contains(&format!("\"gitdir:{dir}\"")) {
                return false;
            }
        }
        self.body.iter().any(|line| {
            let trimmed = line.trim();
            trimmed.starts_with("path") && trimmed.replace('\\', "/").contains(target)
        })
    }
}

/// A gitconfig file split into sections
#[derive(Debug, Clone, PartialEq, Eq)]
struct GitConfigDocument {
    sections: Vec<Section>,
}

impl GitConfigDocument {
    fn parse(content: &str) -> Self {
        let mut sections = vec![Section {
            leading: Vec::new(),
            header: None,
            body: Vec::new(),
        }];

        for line in content.split('\n') {
            if line.trim().starts_with('[') {
                let current = sections.last_mut().map(|s| &mut s.body);
                let leading = current.map(take_trailing_trivia).unwrap_or_default();
                sections.push(Section {
                    leading,
                    header: Some(line.to_string()),
                    body: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.body.push(line.to_string());
            }
        }

        Self { sections }
    }

    fn has_include(&self, target: &str, dir: Option<&str>) -> bool {
        self.sections.iter().any(|s| s.is_include_of(target, dir))
    }

    /// Drops matching include sections with their marker comment
    fn remove_includes(&mut self, target: &str, dir: Option<&str>) -> usize {
        let mut removed = 0;
        for section in &mut self.sections {
            if !section.is_include_of(target, dir) {
                continue;
            }
            if section
                .leading
                .last()
                .is_some_and(|line| line.trim() == RULE_MARKER)
            {
                section.leading.pop();
                if section.leading.last().is_some_and(|line| line.trim().is_empty()) {
                    section.leading.pop();
                }
            }
            section.header = None;
            section.body.clear();
            removed += 1;
        }
        removed
    }

    /// Joins the sections back, trimmed and ending in one newline
    fn render(&self) -> String {
        let lines: Vec<&str> = self
            .sections
            .iter()
            .flat_map(|s| {
                s.leading
                    .iter()
                    .chain(s.header.iter())
                    .chain(s.body.iter())
                    .map(String::as_str)
            })
            .collect();

        let output = lines.join("\n");
        let output = output.trim();
        if output.is_empty() {
            String::new()
        } else {
            format!("{output}\n")
        }
    }
}

/// Splits off the comment and blank lines at the end of a section body
fn take_trailing_trivia(body: &mut Vec<String>) -> Vec<String> {
    let keep = body
        .iter()
        .rposition(|line| {
            let trimmed = line.trim();
            !(trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';'))
        })
        .map_or(0, |idx| idx + 1);
    body.split_off(keep)
}
