use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Context-aware identity manager for Git
#[derive(Parser, Debug)]
#[command(name = "gitego", version, about)]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand chosen to execute; without one an interactive menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Profile attributes shared by `add` and `edit`
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileFlags {
    /// Login username for the service (e.g. GitHub username)
    #[arg(long)]
    pub username: Option<String>,
    /// Path to the SSH key for this profile
    #[arg(long)]
    pub ssh_key: Option<String>,
    /// Commit signing key (user.signingkey)
    #[arg(long)]
    pub signing_key: Option<String>,
    /// Personal access token, stored in the OS keychain
    #[arg(long)]
    pub pat: Option<String>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Adds a new profile
    Add {
        /// Name of the new profile (e.g. "work")
        profile_name: String,
        /// user.name for the profile
        #[arg(short, long)]
        name: String,
        /// user.email for the profile
        #[arg(short, long)]
        email: String,
        #[command(flatten)]
        flags: ProfileFlags,
    },
    /// Edits an existing profile; only the given flags change
    Edit {
        profile_name: String,
        /// New user.name
        #[arg(short, long)]
        name: Option<String>,
        /// New user.email
        #[arg(short, long)]
        email: Option<String>,
        #[command(flatten)]
        flags: ProfileFlags,
    },
    /// Lists all profiles
    #[command(alias = "ls")]
    List,
    /// Removes a profile, its rules and its stored token
    #[command(alias = "remove")]
    Rm {
        profile_name: String,
        /// Remove without asking for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Sets a profile as the global default
    Use { profile_name: String },
    /// Uses a profile automatically for repositories under a directory
    Auto {
        /// Directory the rule applies to
        path: String,
        profile_name: String,
    },
    /// Removes the auto-switch rule for a directory
    Unauto { path: String },
    /// Displays the effective Git identity and the rule behind it
    Status,
    /// Installs the pre-commit hook that checks the commit author
    InstallHook,
    /// Generates a shell completion script
    Completion { shell: Shell },
    /// Git credential helper
    #[command(hide = true)]
    Credential {
        /// Helper operation requested by Git (get, store, erase)
        operation: Option<String>,
    },
    /// Internal commands run by hooks
    #[command(hide = true)]
    Internal {
        #[command(subcommand)]
        command: InternalCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum InternalCommands {
    /// Checks the commit author against the expected profile
    CheckCommit,
}
