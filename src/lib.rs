//! # auth-portal
//!
//! Client side of the account flows served by the auth API: login,
//! registration, password reset and email verification.
//!
//! ## Layers
//!
//! - [`api`]: JSON-over-HTTP transport with one error type, [`api::RequestError`].
//! - [`auth`]: typed backend calls, the persisted session and route guards.
//! - [`forms`]: per-page validation and submission state.
//! - [`cli`]: the `auth-portal` command, one subcommand per page.
//!
//! ## Session Persistence
//!
//! A session is the access token, the refresh token and the user snapshot. All
//! three are written together under `auth_token`, `refresh_token` and
//! `user_data`, and hydration only trusts them as a set. Anything else found in
//! storage on startup is discarded and the client starts signed out.
//!
//! Tokens and passwords are secrets: they are redacted from `Debug` output and
//! must never be logged.

pub mod api;
pub mod auth;
pub mod cli;
pub mod forms;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
