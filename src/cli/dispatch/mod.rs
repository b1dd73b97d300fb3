//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the [`Action`] the binary executes. Field
//! validation is left to the form controllers so the CLI reports the same
//! messages a page would.

use crate::cli::{
    actions::{account, recovery, Action},
    commands::{
        account::{
            LoginOptions, RegisterOptions, CMD_LOGIN, CMD_LOGOUT, CMD_REFRESH, CMD_REGISTER,
            CMD_WHOAMI,
        },
        recovery::{
            parse_email, ResetPasswordOptions, TokenSource, CMD_FORGOT_PASSWORD,
            CMD_RESEND_VERIFICATION, CMD_RESET_PASSWORD, CMD_VERIFY_EMAIL,
        },
        session, CMD_HEALTH,
    },
    globals::GlobalArgs,
};
use anyhow::{bail, Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::from(session::Options::parse(matches)?);

    let (name, sub_m) = matches.subcommand().context("missing subcommand")?;

    let action = match name {
        CMD_LOGIN => Action::Login(account::LoginArgs {
            globals,
            options: LoginOptions::parse(sub_m)?,
        }),
        CMD_REGISTER => Action::Register(account::RegisterArgs {
            globals,
            options: RegisterOptions::parse(sub_m)?,
        }),
        CMD_LOGOUT => Action::Logout(globals),
        CMD_WHOAMI => Action::Whoami(globals),
        CMD_REFRESH => Action::Refresh(globals),
        CMD_FORGOT_PASSWORD => Action::ForgotPassword(recovery::EmailArgs {
            globals,
            email: parse_email(sub_m)?,
        }),
        CMD_RESET_PASSWORD => Action::ResetPassword(recovery::ResetPasswordArgs {
            globals,
            options: ResetPasswordOptions::parse(sub_m)?,
        }),
        CMD_VERIFY_EMAIL => Action::VerifyEmail(recovery::VerifyEmailArgs {
            globals,
            source: TokenSource::parse(sub_m),
        }),
        CMD_RESEND_VERIFICATION => Action::ResendVerification(recovery::EmailArgs {
            globals,
            email: parse_email(sub_m)?,
        }),
        CMD_HEALTH => Action::Health(globals),
        other => bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn dispatch(args: &[&str]) -> Result<Action> {
        temp_env::with_vars(
            [
                ("AUTH_PORTAL_API_URL", None::<&str>),
                ("AUTH_PORTAL_SESSION_FILE", Some("/tmp/auth-portal-test.json")),
                ("AUTH_PORTAL_PASSWORD", None),
                ("AUTH_PORTAL_NEW_PASSWORD", None),
            ],
            || {
                let matches = commands::new().get_matches_from(args);
                handler(&matches)
            },
        )
    }

    #[test]
    fn maps_login() {
        let action = dispatch(&["auth-portal", "login", "-e", "a@b.com", "-p", "12345678"]).unwrap();
        let Action::Login(args) = action else {
            panic!("expected login action");
        };
        assert_eq!(args.options.email, "a@b.com");
        assert_eq!(args.globals.api_url, "http://localhost:3000/api");
        assert_eq!(
            args.globals.session_file,
            std::path::PathBuf::from("/tmp/auth-portal-test.json")
        );
    }

    #[test]
    fn maps_session_commands() {
        assert!(matches!(
            dispatch(&["auth-portal", "logout"]).unwrap(),
            Action::Logout(_)
        ));
        assert!(matches!(
            dispatch(&["auth-portal", "whoami"]).unwrap(),
            Action::Whoami(_)
        ));
        assert!(matches!(
            dispatch(&["auth-portal", "refresh"]).unwrap(),
            Action::Refresh(_)
        ));
        assert!(matches!(
            dispatch(&["auth-portal", "health"]).unwrap(),
            Action::Health(_)
        ));
    }

    #[test]
    fn maps_recovery_commands() {
        let Action::VerifyEmail(args) =
            dispatch(&["auth-portal", "verify-email", "--token", "abc"]).unwrap()
        else {
            panic!("expected verify-email action");
        };
        assert_eq!(args.source.resolve().as_deref(), Some("abc"));

        let Action::ResendVerification(args) =
            dispatch(&["auth-portal", "resend-verification", "-e", "a@b.com"]).unwrap()
        else {
            panic!("expected resend-verification action");
        };
        assert_eq!(args.email, "a@b.com");

        assert!(matches!(
            dispatch(&["auth-portal", "forgot-password", "-e", "a@b.com"]).unwrap(),
            Action::ForgotPassword(_)
        ));
        assert!(matches!(
            dispatch(&["auth-portal", "reset-password", "-p", "12345678"]).unwrap(),
            Action::ResetPassword(_)
        ));
    }

    #[test]
    fn global_args_follow_subcommand() {
        let Action::Health(globals) = dispatch(&[
            "auth-portal",
            "health",
            "--api-url",
            "https://auth.example.com/api",
        ])
        .unwrap() else {
            panic!("expected health action");
        };
        assert_eq!(globals.api_url, "https://auth.example.com/api");
    }
}
