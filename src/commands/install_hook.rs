use std::{
    fs::{self, OpenOptions},
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use colored::Colorize;

use crate::{commands::ask, error::AppError};

/// Command the hook runs
pub const HOOK_COMMAND: &str = "gitego internal check-commit";

/// Block written into the pre-commit hook
const HOOK_SCRIPT: &str = "
# gitego pre-commit hook
# Checks the commit author against the profile expected for this directory.
gitego internal check-commit
";

/// Result of installing the hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookInstall {
    Created(PathBuf),
    Appended(PathBuf),
    AlreadyInstalled,
    Cancelled,
}

/// Finds the repository root by walking up from `start_dir`
pub fn find_git_root(start_dir: &Path) -> Result<PathBuf, AppError> {
    let start = std::path::absolute(start_dir)?;
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
        .ok_or(AppError::NotInGitRepository)
}

/// Installs the commit guard as the repository's pre-commit hook.
///
/// An existing hook without the guard is only extended after confirmation.
pub fn install_hook(
    start_dir: &Path,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<HookInstall, AppError> {
    let git_root = find_git_root(start_dir)?;
    let hooks_dir = git_root.join(".git").join("hooks");
    fs::create_dir_all(&hooks_dir)?;
    let hook_path = hooks_dir.join("pre-commit");

    if !hook_path.exists() {
        fs::write(&hook_path, format!("#!/bin/sh{HOOK_SCRIPT}"))?;
        make_executable(&hook_path)?;
        writeln!(
            out,
            "{} gitego pre-commit hook installed in {}",
            "✓".green(),
            hook_path.display()
        )?;
        return Ok(HookInstall::Created(hook_path));
    }

    let content = fs::read_to_string(&hook_path)?;
    if content.contains(HOOK_COMMAND) {
        writeln!(out, "{} gitego pre-commit hook is already installed", "✓".green())?;
        return Ok(HookInstall::AlreadyInstalled);
    }

    let answer = ask(
        "A pre-commit hook already exists. Append gitego check? [Y/n]: ",
        input,
        out,
    )?;
    if answer == "n" {
        writeln!(
            out,
            "\ninstall cancelled, add this line to your pre-commit hook manually:\n  {HOOK_COMMAND}"
        )?;
        return Ok(HookInstall::Cancelled);
    }

    let mut file = OpenOptions::new().append(true).open(&hook_path)?;
    file.write_all(HOOK_SCRIPT.as_bytes())?;
    writeln!(
        out,
        "{} gitego check appended to {}",
        "✓".green(),
        hook_path.display()
    )?;
    Ok(HookInstall::Appended(hook_path))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), AppError> {
    Ok(())
}
