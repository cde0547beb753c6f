use colored::Colorize;
use inquire::Text;

use crate::{error::AppError, menu::BACK_OPTION, profile::Config};

/// Maximum length for a profile name
const MAX_PROFILE_NAME_LENGTH: usize = 64;

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        let input = input.trim().to_string();
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

/// Validates a new profile name
///
/// The name becomes a file name under the profiles directory, so path
/// separators are rejected.
pub fn validate_new_profile_name(profile_name: &str, config: &Config) -> Result<(), AppError> {
    validate_profile_name(profile_name)?;
    if config.has_profile(profile_name) {
        return Err(AppError::ProfileExists(profile_name.to_string()));
    }
    Ok(())
}

/// Validates the shape of a profile name
pub fn validate_profile_name(profile_name: &str) -> Result<(), AppError> {
    if profile_name.trim().is_empty() {
        Err(AppError::Validation("profile name cannot be empty".to_string()))
    } else if profile_name.len() > MAX_PROFILE_NAME_LENGTH {
        Err(AppError::Validation(format!(
            "profile name too long (max {MAX_PROFILE_NAME_LENGTH} characters)"
        )))
    } else if profile_name == BACK_OPTION {
        Err(AppError::Validation(format!("profile name cannot be '{BACK_OPTION}'")))
    } else if profile_name.contains(['/', '\\']) || profile_name.starts_with('.') {
        Err(AppError::Validation(
            "profile name cannot contain path separators or start with '.'".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validates a Git user name
pub fn validate_user_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        Err(AppError::Validation("name cannot be empty".to_string()))
    } else {
        Ok(())
    }
}

/// Validates a Git email; any non-empty value is accepted
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        Err(AppError::Validation("email cannot be empty".to_string()))
    } else {
        Ok(())
    }
}
