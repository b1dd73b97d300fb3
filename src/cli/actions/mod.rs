pub mod account;
pub mod health;
pub mod recovery;

// The match over every action lives in `run` so this file stays small.
mod run;

use crate::{cli::globals::GlobalArgs, forms::FormState};
use anyhow::{bail, Result};

#[derive(Debug)]
pub enum Action {
    Login(account::LoginArgs),
    Register(account::RegisterArgs),
    Logout(GlobalArgs),
    Whoami(GlobalArgs),
    Refresh(GlobalArgs),
    ForgotPassword(recovery::EmailArgs),
    ResetPassword(recovery::ResetPasswordArgs),
    VerifyEmail(recovery::VerifyEmailArgs),
    ResendVerification(recovery::EmailArgs),
    Health(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Prints a successful form outcome; every other state becomes the error the
/// process exits with.
fn report(state: FormState) -> Result<()> {
    match state {
        FormState::Success(feedback) => {
            println!("{}", feedback.message);
            Ok(())
        }
        FormState::Invalid(errors) => {
            for error in errors.iter() {
                eprintln!("  --{}: {}", flag_name(error.field), error.message);
            }
            bail!("invalid input")
        }
        FormState::Error(message) => bail!(message),
        FormState::Busy | FormState::Idle => bail!("request did not complete"),
    }
}

/// `confirmPassword` -> `confirm-password`.
fn flag_name(field: &str) -> String {
    let mut flag = String::with_capacity(field.len() + 2);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            flag.push('-');
            flag.push(c.to_ascii_lowercase());
        } else {
            flag.push(c);
        }
    }
    flag
}
