//! Pre-commit identity check.
//!
//! Compares the email Git will commit with against the email of the profile
//! an auto-switch rule expects for the current directory. Any failure to
//! gather the facts lets the commit through; only an actual mismatch asks
//! the user, and only an answer other than "n" aborts.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::commands::{Context, ask};

/// Exit code letting the commit proceed
pub const EXIT_PROCEED: i32 = 0;
/// Exit code aborting the commit
pub const EXIT_ABORT: i32 = 1;

/// Outcome of comparing the commit identity with the expected profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to check; the reason is only logged
    Skip(&'static str),
    Match,
    Mismatch {
        git_email: String,
        profile: String,
        profile_email: String,
    },
}

/// Decides whether the commit identity needs the user's attention
pub fn evaluate(ctx: &Context) -> Verdict {
    let git_email = match ctx.git.get("user.email") {
        Ok(email) => email,
        Err(_) => return Verdict::Skip("no effective user.email"),
    };

    let config = match ctx.store.load() {
        Ok(config) => config,
        Err(_) => return Verdict::Skip("config could not be loaded"),
    };
    if config.auto_rules.is_empty() {
        return Verdict::Skip("no auto-switch rules");
    }

    let expected = ctx.resolve(&config);
    // Manual selection is trusted; only a specific rule is enforced.
    if expected.is_empty() || expected.profile == config.active_profile {
        return Verdict::Skip("no specific rule applies");
    }

    let Some(profile) = config.profile(&expected.profile) else {
        return Verdict::Skip("rule points to a missing profile");
    };

    if profile.email == git_email {
        Verdict::Match
    } else {
        Verdict::Mismatch {
            git_email,
            profile: expected.profile,
            profile_email: profile.email.clone(),
        }
    }
}

/// Runs the check, prompting on `err` and reading the answer from `input`.
///
/// Returns the process exit code.
pub fn check_commit(ctx: &Context, input: &mut dyn BufRead, err: &mut dyn Write) -> i32 {
    match evaluate(ctx) {
        Verdict::Skip(reason) => {
            debug!(reason, "commit check skipped");
            EXIT_PROCEED
        }
        Verdict::Match => EXIT_PROCEED,
        Verdict::Mismatch {
            git_email,
            profile,
            profile_email,
        } => prompt_on_mismatch(&git_email, &profile, &profile_email, input, err),
    }
}

fn prompt_on_mismatch(
    git_email: &str,
    profile: &str,
    profile_email: &str,
    input: &mut dyn BufRead,
    err: &mut dyn Write,
) -> i32 {
    let warning = format!(
        "\n--- gitego Safety Check ---\n\
         Warning: Your effective Git email for this repo is '{git_email}'.\n\
         However, the profile expected for this directory is '{profile}' ('{profile_email}').\n\
         ---------------------------\n"
    );
    // A broken stderr or stdin reads as an empty answer, which aborts.
    let _ = err.write_all(warning.as_bytes());
    let answer = ask("Do you want to abort the commit? [Y/n]: ", input, err).unwrap_or_default();

    if answer == "n" {
        let _ = writeln!(err, "Commit proceeding with mismatched user.");
        EXIT_PROCEED
    } else {
        let _ = writeln!(err, "Commit aborted by user.");
        EXIT_ABORT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeGit, TestEnv, personal_profile, work_profile};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    /// Config with a `work` rule for `code/work`, current dir inside it
    fn env_with_rule(git_email: &str) -> TestEnv {
        let mut env = TestEnv::new();
        env.git = FakeGit::with_value("user.email", git_email);
        env.add_profile("work", work_profile());
        env.add_profile("personal", personal_profile());
        env.add_rule("code/work", "work");
        env.cd("code/work/repo");
        env
    }

    fn run(env: &TestEnv, answer: &str) -> (i32, String) {
        let mut err: Vec<u8> = Vec::new();
        let code = check_commit(&env.ctx(), &mut Cursor::new(answer), &mut err);
        (code, String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_matching_email_passes_silently() {
        let env = env_with_rule("jane@work.com");
        let (code, err) = run(&env, "");
        assert_eq!(code, EXIT_PROCEED);
        assert_eq!(err, "");
    }

    #[test]
    fn test_mismatch_answered_n_proceeds() {
        let env = env_with_rule("jane@home.org");
        let (code, err) = run(&env, "n\n");
        assert_eq!(code, EXIT_PROCEED);
        assert!(err.contains("'jane@home.org'"));
        assert!(err.contains("'work' ('jane@work.com')"));
        assert!(err.contains("[Y/n]"));
        assert!(err.contains("Commit proceeding with mismatched user."));
    }

    #[rstest]
    #[case("")]
    #[case("\n")]
    #[case("y\n")]
    #[case("no\n")]
    fn test_mismatch_otherwise_aborts(#[case] answer: &str) {
        let env = env_with_rule("jane@home.org");
        let (code, err) = run(&env, answer);
        assert_eq!(code, EXIT_ABORT);
        assert!(err.contains("Commit aborted by user."));
    }

    #[test]
    fn test_uppercase_n_proceeds() {
        let env = env_with_rule("jane@home.org");
        assert_eq!(run(&env, "  N \n").0, EXIT_PROCEED);
    }

    #[test]
    fn test_no_git_email_passes() {
        let mut env = env_with_rule("x");
        env.git = FakeGit::default();
        assert_eq!(evaluate(&env.ctx()), Verdict::Skip("no effective user.email"));
        assert_eq!(run(&env, "").0, EXIT_PROCEED);
    }

    #[test]
    fn test_config_load_failure_passes() {
        let env = env_with_rule("jane@home.org");
        env.store.fail_load.set(true);
        assert_eq!(run(&env, "").0, EXIT_PROCEED);
    }

    #[test]
    fn test_no_rules_passes() {
        let env = env_with_rule("jane@home.org");
        env.store.config.borrow_mut().auto_rules.clear();
        assert_eq!(evaluate(&env.ctx()), Verdict::Skip("no auto-switch rules"));
    }

    #[test]
    fn test_outside_rule_passes() {
        let mut env = env_with_rule("jane@home.org");
        env.cd("elsewhere");
        assert_eq!(evaluate(&env.ctx()), Verdict::Skip("no specific rule applies"));
    }

    #[test]
    fn test_rule_for_active_profile_is_trusted() {
        let env = env_with_rule("jane@home.org");
        env.store.config.borrow_mut().active_profile = "work".to_string();
        assert_eq!(evaluate(&env.ctx()), Verdict::Skip("no specific rule applies"));
    }

    #[test]
    fn test_dangling_rule_passes() {
        let env = env_with_rule("jane@home.org");
        env.store.config.borrow_mut().profiles.remove("work");
        assert_eq!(evaluate(&env.ctx()), Verdict::Skip("rule points to a missing profile"));
    }
}
