//! Git credential helper.
//!
//! Git runs `gitego credential get`, writes the request to stdin and reads
//! `username=`/`password=` lines back. Empty output means "no credentials",
//! so every failure is silent and Git moves on to its next helper.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::{commands::Context, error::AppError};

/// Answers one credential helper request
pub fn respond(
    ctx: &Context,
    operation: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    // The request must be consumed even though its fields are not used.
    if let Err(err) = io::copy(input, &mut io::sink()) {
        debug!(%err, "could not drain credential request");
    }

    if operation.is_some_and(|op| op != "get") {
        debug!(?operation, "ignoring credential operation");
        return Ok(());
    }

    let Some((username, token)) = lookup(ctx) else {
        return Ok(());
    };
    write!(out, "username={username}\npassword={token}\n")?;
    out.flush()?;
    Ok(())
}

/// Login handle and token of the profile active in the current directory
fn lookup(ctx: &Context) -> Option<(String, String)> {
    let config = ctx.store.load().ok()?;
    let resolution = ctx.resolve(&config);
    if resolution.is_empty() {
        debug!("no active profile for credential request");
        return None;
    }

    let username = config.profile(&resolution.profile)?.username.clone()?;
    match ctx.secrets.get(&resolution.profile) {
        Ok(Some(token)) if !token.is_empty() => Some((username, token)),
        Ok(_) => None,
        Err(err) => {
            debug!(%err, "token lookup failed");
            None
        }
    }
}
