use crate::{
    cli::{
        actions::report,
        commands::recovery::{ResetPasswordOptions, TokenSource},
        globals::GlobalArgs,
    },
    forms::{
        ForgotPasswordForm, ForgotPasswordInput, ResendVerificationForm, ResendVerificationInput,
        ResetPasswordForm, ResetPasswordInput, VerifyEmailFlow,
    },
};
use anyhow::Result;
use tracing::instrument;

#[derive(Debug)]
pub struct EmailArgs {
    pub globals: GlobalArgs,
    pub email: String,
}

#[derive(Debug)]
pub struct ResetPasswordArgs {
    pub globals: GlobalArgs,
    pub options: ResetPasswordOptions,
}

#[derive(Debug)]
pub struct VerifyEmailArgs {
    pub globals: GlobalArgs,
    pub source: TokenSource,
}

/// # Errors
/// Returns an error if the email is invalid or the request fails.
#[instrument(skip_all, fields(command = "forgot-password"))]
pub async fn forgot_password(args: EmailArgs) -> Result<()> {
    let form = ForgotPasswordForm::new(args.globals.client()?);
    report(form.submit(ForgotPasswordInput { email: args.email }).await)
}

/// # Errors
/// Returns an error if the token is missing, the passwords are invalid or the
/// reset is rejected.
#[instrument(skip_all, fields(command = "reset-password"))]
pub async fn reset_password(args: ResetPasswordArgs) -> Result<()> {
    let options = args.options;
    let form = ResetPasswordForm::new(args.globals.client()?, options.source.resolve());
    let input = ResetPasswordInput {
        password: options.password,
        confirm_password: options.confirm_password,
    };
    report(form.submit(input).await)
}

/// # Errors
/// Returns an error if the token is missing or verification fails.
#[instrument(skip_all, fields(command = "verify-email"))]
pub async fn verify_email(args: VerifyEmailArgs) -> Result<()> {
    let flow = VerifyEmailFlow::new(args.globals.client()?, args.source.resolve());
    report(flow.verify().await)
}

/// # Errors
/// Returns an error if the email is invalid or the request fails.
#[instrument(skip_all, fields(command = "resend-verification"))]
pub async fn resend_verification(args: EmailArgs) -> Result<()> {
    let form = ResendVerificationForm::new(args.globals.client()?);
    report(
        form.submit(ResendVerificationInput { email: args.email })
            .await,
    )
}
