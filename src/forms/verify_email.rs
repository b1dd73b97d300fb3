//! Email verification page and the resend form shown next to it.

use crate::{
    auth::{client::AuthApi, types::ResendVerificationRequest},
    forms::{
        link::token_from_link,
        validation::{check_email, ValidationErrors},
        Feedback, FormCore, FormState,
    },
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const VERIFICATION_TOKEN_MISSING: &str = "Invalid or missing verification token.";
pub const EMAIL_VERIFIED: &str = "Your email has been successfully verified!";
pub const VERIFICATION_FAILED: &str = "Invalid or expired verification link.";
pub const VERIFICATION_RESENT: &str = "If that email exists, a new link is on the way.";
pub const RESEND_FAILED: &str = "Failed to send verification email. Please try again.";

/// Verifies the token from the link exactly once.
pub struct VerifyEmailFlow {
    api: Arc<dyn AuthApi>,
    token: Option<String>,
    core: FormCore,
}

impl VerifyEmailFlow {
    /// A missing or blank token puts the flow straight into its error state.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, token: Option<String>) -> Self {
        let token = token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let core = if token.is_some() {
            FormCore::default()
        } else {
            debug!("verify email page opened without a token");
            FormCore::with_state(FormState::Error(VERIFICATION_TOKEN_MISSING.to_string()))
        };
        Self { api, token, core }
    }

    #[must_use]
    pub fn from_link(api: Arc<dyn AuthApi>, link: &str) -> Self {
        Self::new(api, token_from_link(link))
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.core.state()
    }

    /// Runs verification on the first call. Later calls return the current
    /// state without contacting the backend: `Busy` while the first call is
    /// still running, its outcome afterwards.
    pub async fn verify(&self) -> FormState {
        let Some(_busy) = self.core.begin_once() else {
            return self.core.state();
        };

        let Some(token) = self.token.as_deref() else {
            return self
                .core
                .set(FormState::Error(VERIFICATION_TOKEN_MISSING.to_string()));
        };

        match self.api.verify_email(token).await {
            Ok(_) => {
                info!("email verified");
                self.core
                    .set(FormState::Success(Feedback::message(EMAIL_VERIFIED)))
            }
            Err(err) => {
                warn!("email verification failed: {err}");
                self.core
                    .set(FormState::Error(VERIFICATION_FAILED.to_string()))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResendVerificationInput {
    pub email: String,
}

pub struct ResendVerificationForm {
    api: Arc<dyn AuthApi>,
    core: FormCore,
}

impl ResendVerificationForm {
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
    pub fn validate(input: &ResendVerificationInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &input.email);
        errors.into_result()
    }

    pub async fn submit(&self, input: ResendVerificationInput) -> FormState {
        let Some(_busy) = self.core.try_begin() else {
            return FormState::Busy;
        };

        if let Err(errors) = Self::validate(&input) {
            return self.core.set(FormState::Invalid(errors));
        }

        let request = ResendVerificationRequest {
            email: input.email.trim().to_string(),
        };
        match self.api.resend_verification(&request).await {
            Ok(_) => self
                .core
                .set(FormState::Success(Feedback::message(VERIFICATION_RESENT))),
            Err(err) => {
                warn!("resend verification failed: {err}");
                self.core.set(FormState::Error(RESEND_FAILED.to_string()))
            }
        }
    }
}
