//! Subcommands that create, inspect or end the stored session.

use crate::auth::types::UserRole;
use clap::{builder::PossibleValuesParser, Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_REFRESH: &str = "refresh";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_REMEMBER_ME: &str = "remember-me";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_PHONE: &str = "phone";
pub const ARG_ROLE: &str = "role";
pub const ARG_ACCEPT_TERMS: &str = "accept-terms";

pub const ENV_PASSWORD: &str = "AUTH_PORTAL_PASSWORD";

/// Values of a `login` invocation.
#[derive(Debug)]
pub struct LoginOptions {
    pub email: String,
    pub password: SecretString,
    pub remember_me: bool,
}

impl LoginOptions {
    /// # Errors
    /// Returns an error if the email or password is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        Ok(Self {
            email: required(matches, ARG_EMAIL)?,
            password: SecretString::from(required(matches, ARG_PASSWORD)?),
            remember_me: matches.get_flag(ARG_REMEMBER_ME),
        })
    }
}

/// Values of a `register` invocation. Field checks happen in the form, not
/// here, so the user sees every problem at once.
#[derive(Debug)]
pub struct RegisterOptions {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub role: Option<UserRole>,
    pub accept_terms: bool,
}

impl RegisterOptions {
    /// # Errors
    /// Returns an error if a required argument is missing or the role is unknown.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let password = required(matches, ARG_PASSWORD)?;
        let confirm_password = matches
            .get_one::<String>(ARG_CONFIRM_PASSWORD)
            .cloned()
            .unwrap_or_else(|| password.clone());
        let role = matches
            .get_one::<String>(ARG_ROLE)
            .map(|role| role.parse::<UserRole>())
            .transpose()
            .map_err(|err| anyhow::anyhow!(err))?;

        Ok(Self {
            first_name: required(matches, ARG_FIRST_NAME)?,
            last_name: required(matches, ARG_LAST_NAME)?,
            email: required(matches, ARG_EMAIL)?,
            phone: matches.get_one::<String>(ARG_PHONE).cloned(),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm_password),
            role,
            accept_terms: matches.get_flag(ARG_ACCEPT_TERMS),
        })
    }
}

pub(crate) fn required(matches: &ArgMatches, id: &str) -> anyhow::Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
}

pub(crate) fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env(ENV_PASSWORD)
        .hide_env_values(true)
        .required(true)
}

fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in and store the session")
        .arg(email_arg())
        .arg(password_arg())
        .arg(
            Arg::new(ARG_REMEMBER_ME)
                .long(ARG_REMEMBER_ME)
                .help("Ask the server for a long-lived session")
                .action(ArgAction::SetTrue),
        )
}

fn register() -> Command {
    let roles = UserRole::ALL.map(UserRole::as_str);

    Command::new(CMD_REGISTER)
        .about("Create an account and sign in")
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long(ARG_FIRST_NAME)
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LAST_NAME)
                .long(ARG_LAST_NAME)
                .help("Last name")
                .required(true),
        )
        .arg(email_arg())
        .arg(Arg::new(ARG_PHONE).long(ARG_PHONE).help("Phone number"))
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .long(ARG_CONFIRM_PASSWORD)
                .help("Repeat the password (default: same as --password)"),
        )
        .arg(
            Arg::new(ARG_ROLE)
                .long(ARG_ROLE)
                .help("Account type")
                .value_parser(PossibleValuesParser::new(roles)),
        )
        .arg(
            Arg::new(ARG_ACCEPT_TERMS)
                .long(ARG_ACCEPT_TERMS)
                .help("Accept the terms and conditions")
                .action(ArgAction::SetTrue),
        )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(login())
        .subcommand(register())
        .subcommand(Command::new(CMD_LOGOUT).about("Remove the stored session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in user"))
        .subcommand(
            Command::new(CMD_REFRESH).about("Exchange the refresh token for a new session"),
        )
}
