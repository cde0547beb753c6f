mod cli;
mod commands;
mod error;
mod git;
mod gitconfig;
mod logging;
mod menu;
mod normalize;
mod paths;
mod profile;
mod resolver;
mod secrets;
mod storage;
mod validation;

#[cfg(test)]
mod testing;

use std::io;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, InternalCommands, ProfileFlags};
use commands::{
    Context,
    add::{NewProfile, add_profile},
    auto::{deregister_rule, register_rule},
    check_commit::check_commit,
    completion::print_completion,
    credential::respond,
    edit::{ProfileChanges, edit_profile},
    install_hook::install_hook,
    list::list_profiles,
    remove::remove_profile,
    status::show_status,
    use_profile::use_profile,
};
use error::AppError;
use git::GitCli;
use gitconfig::FsGitConfigEditor;
use paths::AppPaths;
use secrets::{KeyringStore, platform_credential_cache};
use storage::JsonConfigStore;

// Main
fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            if let Some(hint) = err.hint() {
                eprintln!("{} {}", "hint:".cyan(), hint);
            }
            std::process::exit(1);
        }
    }
}

/// Runs the chosen command and returns the process exit code
fn run(cli: Cli) -> Result<i32, AppError> {
    // Needs no home directory or stored state.
    if let Some(Commands::Completion { shell }) = &cli.command {
        print_completion(*shell, &mut io::stdout());
        return Ok(0);
    }
    if let Some(Commands::InstallHook) = &cli.command {
        let current_dir = std::env::current_dir()?;
        install_hook(&current_dir, &mut io::stdin().lock(), &mut io::stdout())?;
        return Ok(0);
    }

    let paths = AppPaths::from_home_dir()?;
    let store = JsonConfigStore::new(&paths.config_file);
    let git = GitCli;
    let secrets = KeyringStore::new();
    let credential_cache = platform_credential_cache();
    let editor = FsGitConfigEditor::new(&paths);
    let ctx = Context {
        paths: &paths,
        current_dir: std::env::current_dir().ok(),
        store: &store,
        git: &git,
        secrets: &secrets,
        credential_cache: credential_cache.as_ref(),
        editor: &editor,
    };

    let Some(command) = cli.command else {
        menu::run_menu(&ctx)?;
        return Ok(0);
    };

    match command {
        Commands::Add {
            profile_name,
            name,
            email,
            flags,
        } => {
            let ProfileFlags {
                username,
                ssh_key,
                signing_key,
                pat,
            } = flags;
            add_profile(
                &ctx,
                &profile_name,
                NewProfile {
                    name,
                    email,
                    username,
                    ssh_key,
                    signing_key,
                    pat,
                },
            )?;
        }
        Commands::Edit {
            profile_name,
            name,
            email,
            flags,
        } => {
            let ProfileFlags {
                username,
                ssh_key,
                signing_key,
                pat,
            } = flags;
            edit_profile(
                &ctx,
                &profile_name,
                ProfileChanges {
                    name,
                    email,
                    username,
                    ssh_key,
                    signing_key,
                    pat,
                },
            )?;
        }
        Commands::List => list_profiles(&ctx)?,
        Commands::Rm {
            profile_name,
            force,
        } => {
            remove_profile(
                &ctx,
                &profile_name,
                force,
                &mut io::stdin().lock(),
                &mut io::stdout(),
            )?;
        }
        Commands::Use { profile_name } => use_profile(&ctx, &profile_name)?,
        Commands::Auto { path, profile_name } => {
            register_rule(&ctx, &path, &profile_name)?;
        }
        Commands::Unauto { path } => {
            deregister_rule(&ctx, &path)?;
        }
        Commands::Status => show_status(&ctx)?,
        Commands::Credential { operation } => {
            // Git reads silence as "no credentials", so errors stay quiet.
            if let Err(err) = respond(
                &ctx,
                operation.as_deref(),
                &mut io::stdin().lock(),
                &mut io::stdout(),
            ) {
                tracing::debug!(%err, "credential helper failed");
            }
        }
        Commands::Internal {
            command: InternalCommands::CheckCommit,
        } => {
            return Ok(check_commit(
                &ctx,
                &mut io::stdin().lock(),
                &mut io::stderr(),
            ));
        }
        Commands::Completion { .. } | Commands::InstallHook => unreachable!("handled above"),
    }

    Ok(0)
}
