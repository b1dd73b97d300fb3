use crate::cli::actions::{account, health, recovery, Action};
use anyhow::Result;

// Single dispatch point: a new `Action::*` variant gets its arm here.

/// Execute the provided action.
///
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => account::login(args).await,
        Action::Register(args) => account::register(args).await,
        Action::Logout(globals) => {
            account::logout(&globals);
            Ok(())
        }
        Action::Whoami(globals) => account::whoami(&globals),
        Action::Refresh(globals) => account::refresh(&globals).await,
        Action::ForgotPassword(args) => recovery::forgot_password(args).await,
        Action::ResetPassword(args) => recovery::reset_password(args).await,
        Action::VerifyEmail(args) => recovery::verify_email(args).await,
        Action::ResendVerification(args) => recovery::resend_verification(args).await,
        Action::Health(globals) => health::check(&globals).await,
    }
}
