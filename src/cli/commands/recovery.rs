//! Password reset and email verification subcommands. None of them read or
//! write the stored session.

use crate::cli::commands::account::{email_arg, required, ARG_EMAIL};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_VERIFY_EMAIL: &str = "verify-email";
pub const CMD_RESEND_VERIFICATION: &str = "resend-verification";

pub const ARG_LINK: &str = "link";
pub const ARG_TOKEN: &str = "token";
pub const ARG_NEW_PASSWORD: &str = "new-password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

pub const ENV_NEW_PASSWORD: &str = "AUTH_PORTAL_NEW_PASSWORD";

/// Where the emailed token comes from. Both may be absent; the form reports
/// the missing token itself.
#[derive(Debug, Default)]
pub struct TokenSource {
    pub link: Option<String>,
    pub token: Option<String>,
}

impl TokenSource {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            link: matches.get_one::<String>(ARG_LINK).cloned(),
            token: matches.get_one::<String>(ARG_TOKEN).cloned(),
        }
    }

    /// The token, taken from `--token` or extracted from `--link`.
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        match (&self.token, &self.link) {
            (Some(token), _) => Some(token.clone()),
            (None, Some(link)) => crate::forms::token_from_link(link),
            (None, None) => None,
        }
    }
}

#[derive(Debug)]
pub struct ResetPasswordOptions {
    pub source: TokenSource,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl ResetPasswordOptions {
    /// # Errors
    /// Returns an error if the new password is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let password = required(matches, ARG_NEW_PASSWORD)?;
        let confirm_password = matches
            .get_one::<String>(ARG_CONFIRM_PASSWORD)
            .cloned()
            .unwrap_or_else(|| password.clone());

        Ok(Self {
            source: TokenSource::parse(matches),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm_password),
        })
    }
}

/// # Errors
/// Returns an error if `--email` is missing.
pub fn parse_email(matches: &ArgMatches) -> anyhow::Result<String> {
    required(matches, ARG_EMAIL)
}

fn token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LINK)
                .short('l')
                .long(ARG_LINK)
                .help("Link from the email")
                .conflicts_with(ARG_TOKEN),
        )
        .arg(
            Arg::new(ARG_TOKEN)
                .short('t')
                .long(ARG_TOKEN)
                .help("Token from the email link"),
        )
}

fn reset_password() -> Command {
    token_args(Command::new(CMD_RESET_PASSWORD).about("Set a new password using an emailed link"))
        .arg(
            Arg::new(ARG_NEW_PASSWORD)
                .short('p')
                .long(ARG_NEW_PASSWORD)
                .help("New password")
                .env(ENV_NEW_PASSWORD)
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .long(ARG_CONFIRM_PASSWORD)
                .help("Repeat the new password (default: same as --new-password)"),
        )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Email a password reset link")
                .arg(email_arg()),
        )
        .subcommand(reset_password())
        .subcommand(token_args(
            Command::new(CMD_VERIFY_EMAIL).about("Confirm an email address using an emailed link"),
        ))
        .subcommand(
            Command::new(CMD_RESEND_VERIFICATION)
                .about("Send a new verification email")
                .arg(email_arg()),
        )
}
