use colored::Colorize;
use inquire::{Confirm, Select};

use crate::{
    commands::{
        Context,
        add::{NewProfile, add_profile},
        list::list_profiles,
        remove::remove_profile,
        status::show_status,
        use_profile::use_profile,
    },
    error::AppError,
    profile::Config,
    validation::{prompt_until_valid, validate_email, validate_new_profile_name, validate_user_name},
};

/// Menu entry that returns to the main menu
pub const BACK_OPTION: &str = "back";

/// Runs interactive menu interface
pub fn run_menu(ctx: &Context) -> Result<(), AppError> {
    loop {
        let actions: Vec<&'static str> = vec![
            "use profile",
            "add profile",
            "remove profile",
            "show status",
            "list profiles",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        let result = match action_selected {
            "use profile" => menu_use_profile(ctx),
            "add profile" => menu_add_profile(ctx),
            "remove profile" => menu_remove_profile(ctx),
            "show status" => show_status(ctx),
            "list profiles" => list_profiles(ctx),
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // Domain errors go back to the menu; prompt failures end it.
        match result {
            Err(err @ AppError::Inquire(_)) => break Err(err),
            Err(err) => println!("{} {}", "error:".red(), err),
            Ok(()) => {}
        }
    }
}

/// Menu for switching the active profile
fn menu_use_profile(ctx: &Context) -> Result<(), AppError> {
    let config: Config = ctx.store.load()?;
    let Some(profile_name) = select_profile(&config, "select profile to use:")? else {
        return Ok(());
    };
    use_profile(ctx, &profile_name)
}

/// Menu for adding a new profile
fn menu_add_profile(ctx: &Context) -> Result<(), AppError> {
    let config: Config = ctx.store.load()?;

    let profile_name: String = prompt_until_valid(
        &format!("{}", "enter profile name:".blue()),
        |input| validate_new_profile_name(input, &config),
    )?;
    let name: String = prompt_until_valid(&format!("{}", "enter git user name:".blue()), validate_user_name)?;
    let email: String = prompt_until_valid(&format!("{}", "enter git email:".blue()), validate_email)?;

    add_profile(
        ctx,
        &profile_name,
        NewProfile {
            name,
            email,
            ..NewProfile::default()
        },
    )
}

/// Menu for removing a profile
fn menu_remove_profile(ctx: &Context) -> Result<(), AppError> {
    let config: Config = ctx.store.load()?;
    let Some(profile_name) = select_profile(&config, "select profile to remove:")? else {
        return Ok(());
    };

    let confirmed = Confirm::new(&format!("remove '{profile_name}' and all its rules?"))
        .with_default(false)
        .prompt()?;
    if !confirmed {
        println!("removal cancelled");
        return Ok(());
    }

    let stdin = std::io::stdin();
    remove_profile(ctx, &profile_name, true, &mut stdin.lock(), &mut std::io::stdout())?;
    Ok(())
}

/// Lets the user pick a profile, `None` when they go back
fn select_profile(config: &Config, prompt: &str) -> Result<Option<String>, AppError> {
    if config.profiles.is_empty() {
        println!("{}", "no profiles found".red());
        return Ok(None);
    }

    let choice: String = Select::new(&format!("{}", prompt.blue()), build_profile_list(config)).prompt()?;
    Ok((choice != BACK_OPTION).then_some(choice))
}

/// Builds list of profile names for menu to display
pub fn build_profile_list(config: &Config) -> Vec<String> {
    let mut profile_names: Vec<String> = config.profiles.keys().cloned().collect();
    profile_names.push(BACK_OPTION.to_string());
    profile_names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{personal_profile, work_profile};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profile_list_ends_with_back() {
        let mut config = Config::default();
        config.profiles.insert("work".into(), work_profile());
        config.profiles.insert("personal".into(), personal_profile());
        assert_eq!(build_profile_list(&config), vec!["personal", "work", BACK_OPTION]);
    }
}
