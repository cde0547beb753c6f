//! Canonical path form used when comparing directories against auto-switch rules.
//!
//! A normalized path is absolute, symlink-resolved when the target exists,
//! uses `/` as its only separator and ends with exactly one `/`. Prefix tests
//! on this form never confuse `/work/` with `/workshop/`.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

/// Normalizes `path` for rule matching.
///
/// Only fails when no absolute path can be formed at all (empty input, or the
/// current directory is unavailable for a relative input). A path that does
/// not exist yet, or cannot be resolved, degrades to its lexically cleaned
/// absolute form.
pub fn normalize(path: impl AsRef<Path>, home: &Path) -> io::Result<String> {
    let expanded: PathBuf = expand_tilde(path.as_ref(), home);
    let absolute: PathBuf = std::path::absolute(&expanded)?;

    let resolved: PathBuf = match dunce::canonicalize(&absolute) {
        Ok(resolved) => resolved,
        Err(err) => {
            debug!(path = %absolute.display(), %err, "symlink resolution failed, using lexical path");
            lexical_clean(&absolute)
        }
    };

    Ok(with_trailing_slash(&to_slash(&resolved)))
}

/// Whether `current_dir` lies inside `rule_path`, both already normalized.
///
/// Windows paths compare case-insensitively.
pub fn is_within(current_dir: &str, rule_path: &str) -> bool {
    if cfg!(windows) {
        current_dir
            .to_lowercase()
            .starts_with(&rule_path.to_lowercase())
    } else {
        current_dir.starts_with(rule_path)
    }
}

fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Removes `.` and `..` components without touching the filesystem
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    cleaned.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    cleaned.pop();
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn with_trailing_slash(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}
