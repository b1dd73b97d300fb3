//! Connection and storage arguments shared by every subcommand.

use crate::api::config::{DEFAULT_API_BASE_URL, ENV_API_URL, ENV_TIMEOUT_SECONDS};
use clap::{Arg, ArgMatches, Command};
use std::{env::var, path::PathBuf, time::Duration};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";

const SESSION_DIR: &str = ".auth-portal";
const SESSION_FILE: &str = "session.json";

#[derive(Debug)]
pub struct Options {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl Options {
    /// Parse connection arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the API URL is blank or the timeout is zero.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_API_URL}"))?;

        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(crate::api::config::DEFAULT_TIMEOUT_SECONDS);
        if timeout == 0 {
            anyhow::bail!("--{ARG_TIMEOUT_SECONDS} must be greater than zero");
        }

        let session_file = matches
            .get_one::<String>(ARG_SESSION_FILE)
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .map_or_else(default_session_file, PathBuf::from);

        Ok(Self {
            api_url,
            session_file,
            timeout: Duration::from_secs(timeout),
        })
    }
}

/// `$HOME/.auth-portal/session.json`, or relative to the working directory
/// when `HOME` is unset.
#[must_use]
pub fn default_session_file() -> PathBuf {
    var("HOME")
        .ok()
        .filter(|home| !home.trim().is_empty())
        .map_or_else(PathBuf::new, PathBuf::from)
        .join(SESSION_DIR)
        .join(SESSION_FILE)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the auth API")
                .env(ENV_API_URL)
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("Where the session is stored (default: $HOME/.auth-portal/session.json)")
                .env("AUTH_PORTAL_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long(ARG_TIMEOUT_SECONDS)
                .help("Request timeout in seconds")
                .env(ENV_TIMEOUT_SECONDS)
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
}
