use crate::{
    auth::{GuardDecision, PublicRoute, RequireAuth, SessionHolder},
    cli::{
        actions::report,
        commands::account::{LoginOptions, RegisterOptions},
        globals::GlobalArgs,
    },
    forms::{LoginForm, LoginInput, RegisterForm, RegisterInput},
};
use anyhow::{bail, Result};
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub options: LoginOptions,
}

#[derive(Debug)]
pub struct RegisterArgs {
    pub globals: GlobalArgs,
    pub options: RegisterOptions,
}

/// Same rule as the public pages: signed-in users are sent away.
fn ensure_signed_out(session: &SessionHolder) -> Result<()> {
    let snapshot = session.snapshot();
    match PublicRoute::default().decide(&snapshot) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Pending => bail!("session is still loading"),
        GuardDecision::Redirect(_) => {
            let email = snapshot.user.map(|user| user.email).unwrap_or_default();
            bail!("already signed in as {email}; run `auth-portal logout` first")
        }
    }
}

/// # Errors
/// Returns an error if already signed in, the input is invalid or the
/// backend rejects the credentials.
#[instrument(skip_all, fields(command = "login"))]
pub async fn login(args: LoginArgs) -> Result<()> {
    let session = args.globals.session(args.globals.client()?);
    ensure_signed_out(&session)?;

    let input = LoginInput {
        email: args.options.email,
        password: args.options.password,
        remember_me: args.options.remember_me,
    };
    report(LoginForm::new(session).submit(input).await)
}

/// # Errors
/// Returns an error if already signed in, the input is invalid or the
/// backend rejects the registration.
#[instrument(skip_all, fields(command = "register"))]
pub async fn register(args: RegisterArgs) -> Result<()> {
    let session = args.globals.session(args.globals.client()?);
    ensure_signed_out(&session)?;

    let options = args.options;
    let input = RegisterInput {
        first_name: options.first_name,
        last_name: options.last_name,
        email: options.email,
        phone: options.phone,
        password: options.password,
        confirm_password: options.confirm_password,
        role: options.role,
        accept_terms: options.accept_terms,
    };
    report(RegisterForm::new(session).submit(input).await)
}

/// Clears the stored session whether or not one existed, even when the API
/// URL is unusable.
pub fn logout(globals: &GlobalArgs) {
    globals.stored_session().logout();
    println!("Signed out");
}

/// # Errors
/// Returns an error if no session is stored.
pub fn whoami(globals: &GlobalArgs) -> Result<()> {
    let session = globals.stored_session();
    let snapshot = session.snapshot();

    match RequireAuth::default().decide(&snapshot) {
        GuardDecision::Allow => {}
        GuardDecision::Pending => bail!("session is still loading"),
        GuardDecision::Redirect(_) => bail!("not signed in"),
    }

    let Some(user) = snapshot.user else {
        bail!("not signed in");
    };
    debug!(user_id = %user.id, "showing stored user");
    println!("{} <{}>", user.full_name(), user.email);
    println!("role: {}", user.role);
    println!("verified: {}", if user.is_verified { "yes" } else { "no" });
    if let Some(phone) = user.phone.as_deref() {
        println!("phone: {phone}");
    }
    Ok(())
}

/// # Errors
/// Returns an error if no session is stored or the refresh is rejected.
#[instrument(skip_all, fields(command = "refresh"))]
pub async fn refresh(globals: &GlobalArgs) -> Result<()> {
    let session = globals.session(globals.client()?);
    let user = session.refresh().await?;
    println!("Session refreshed for {}", user.email);
    Ok(())
}
