use colored::Colorize;

use crate::{commands::Context, error::AppError, profile::Config};

/// One row of the profile table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub active: bool,
    pub profile: String,
    pub name: String,
    pub email: String,
    pub attributes: Vec<&'static str>,
}

/// Builds the table rows, sorted by profile name
pub fn profile_rows(ctx: &Context, config: &Config) -> Vec<ProfileRow> {
    config
        .profiles
        .iter()
        .map(|(profile_name, profile)| {
            let mut attributes = Vec::new();
            if profile.ssh_key.is_some() {
                attributes.push("[SSH]");
            }
            if profile.signing_key.is_some() {
                attributes.push("[GPG]");
            }
            if matches!(ctx.secrets.get(profile_name), Ok(Some(token)) if !token.is_empty()) {
                attributes.push("[PAT]");
            }
            ProfileRow {
                active: *profile_name == config.active_profile,
                profile: profile_name.clone(),
                name: profile.name.clone(),
                email: profile.email.clone(),
                attributes,
            }
        })
        .collect()
}

/// Displays all profiles in the stored config
pub fn list_profiles(ctx: &Context) -> Result<(), AppError> {
    let config = ctx.store.load()?;
    if config.profiles.is_empty() {
        println!(
            "{} no profiles found, use 'gitego add <profile_name>' to create one",
            "note:".yellow()
        );
        return Ok(());
    }

    let rows = profile_rows(ctx, &config);
    let profile_width = column_width("PROFILE", rows.iter().map(|r| r.profile.as_str()));
    let name_width = column_width("NAME", rows.iter().map(|r| r.name.as_str()));
    let email_width = column_width("EMAIL", rows.iter().map(|r| r.email.as_str()));

    println!(
        "{:<6}   {:<profile_width$}   {:<name_width$}   {:<email_width$}   {}",
        "ACTIVE".bold(),
        "PROFILE".bold(),
        "NAME".bold(),
        "EMAIL".bold(),
        "ATTRIBUTES".bold()
    );
    for row in rows {
        let marker = if row.active { "*" } else { " " };
        println!(
            "{:<6}   {:<profile_width$}   {:<name_width$}   {:<email_width$}   {}",
            marker.green(),
            row.profile,
            row.name,
            row.email,
            row.attributes.join(" ")
        );
    }
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).chain([header.len()]).max().unwrap_or(0)
}
