//! Forgot-password and reset-password pages. Neither touches the session.

use crate::{
    auth::{
        client::AuthApi,
        guards::paths,
        types::{ForgotPasswordRequest, ResetPasswordRequest},
    },
    forms::{
        link::token_from_link,
        validation::{check_confirmation, check_email, check_password, ValidationErrors},
        Feedback, FormCore, FormState,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, warn};

pub const RESET_LINK_SENT: &str = "Check your email for a password reset link.";
pub const FORGOT_PASSWORD_FAILED: &str = "Network error. Please try again.";
pub const RESET_LINK_INVALID: &str = "This password reset link is invalid or missing.";
pub const PASSWORD_UPDATED: &str = "Your password has been successfully updated.";
pub const RESET_FAILED: &str = "Failed to reset password. The link may be expired or invalid.";

#[derive(Clone, Debug)]
pub struct ForgotPasswordInput {
    pub email: String,
}

pub struct ForgotPasswordForm {
    api: Arc<dyn AuthApi>,
    core: FormCore,
}

impl ForgotPasswordForm {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            core: FormCore::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.core.state()
    }

    /// # Errors
    /// Returns the per-field failures.
    pub fn validate(input: &ForgotPasswordInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &input.email);
        errors.into_result()
    }

    pub async fn submit(&self, input: ForgotPasswordInput) -> FormState {
        let Some(_busy) = self.core.try_begin() else {
            return FormState::Busy;
        };

        if let Err(errors) = Self::validate(&input) {
            return self.core.set(FormState::Invalid(errors));
        }

        let request = ForgotPasswordRequest {
            email: input.email.trim().to_string(),
        };
        match self.api.forgot_password(&request).await {
            Ok(_) => self
                .core
                .set(FormState::Success(Feedback::message(RESET_LINK_SENT))),
            Err(err) => {
                warn!("password reset request failed: {err}");
                self.core
                    .set(FormState::Error(FORGOT_PASSWORD_FAILED.to_string()))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResetPasswordInput {
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl ResetPasswordInput {
    #[must_use]
    pub fn new(password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
        Self {
            password: SecretString::from(password.into()),
            confirm_password: SecretString::from(confirm_password.into()),
        }
    }
}

/// Bound to the token from the reset link for its whole life.
pub struct ResetPasswordForm {
    api: Arc<dyn AuthApi>,
    token: Option<SecretString>,
    core: FormCore,
}

impl ResetPasswordForm {
    /// A missing or blank token puts the form straight into its error state.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, token: Option<String>) -> Self {
        let token = token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(SecretString::from);
        let core = if token.is_some() {
            FormCore::default()
        } else {
            debug!("reset password form opened without a token");
            FormCore::with_state(FormState::Error(RESET_LINK_INVALID.to_string()))
        };
        Self { api, token, core }
    }

    #[must_use]
    pub fn from_link(api: Arc<dyn AuthApi>, link: &str) -> Self {
        Self::new(api, token_from_link(link))
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.core.state()
    }

    /// # Errors
    /// Returns the per-field failures.
    pub fn validate(input: &ResetPasswordInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_password(&mut errors, "password", input.password.expose_secret());
        check_confirmation(
            &mut errors,
            "confirmPassword",
            input.password.expose_secret(),
            input.confirm_password.expose_secret(),
        );
        errors.into_result()
    }

    /// Sets the new password; success points back at the login page.
    pub async fn submit(&self, input: ResetPasswordInput) -> FormState {
        let Some(_busy) = self.core.try_begin() else {
            return FormState::Busy;
        };

        let Some(token) = &self.token else {
            return self
                .core
                .set(FormState::Error(RESET_LINK_INVALID.to_string()));
        };

        if let Err(errors) = Self::validate(&input) {
            return self.core.set(FormState::Invalid(errors));
        }

        let request = ResetPasswordRequest {
            token: token.expose_secret().to_string(),
            new_password: input.password.expose_secret().to_string(),
        };
        match self.api.reset_password(&request).await {
            Ok(_) => self.core.set(FormState::Success(Feedback::redirect(
                PASSWORD_UPDATED,
                paths::LOGIN,
            ))),
            Err(err) => {
                warn!("password reset failed: {err}");
                self.core.set(FormState::Error(RESET_FAILED.to_string()))
            }
        }
    }
}
