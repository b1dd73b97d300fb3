use crate::{
    auth::{
        guards::paths,
        session::SessionHolder,
        types::{RegisterRequest, UserRole},
    },
    forms::{
        validation::{
            check_confirmation, check_email, check_name, check_password, ValidationErrors,
            ROLE_REQUIRED, TERMS_REQUIRED,
        },
        Feedback, FormCore, FormState,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::warn;

pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

#[derive(Clone, Debug)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub role: Option<UserRole>,
    pub accept_terms: bool,
}

impl RegisterInput {
    fn phone(&self) -> Option<String> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(str::to_string)
    }
}

pub struct RegisterForm {
    session: Arc<SessionHolder>,
    core: FormCore,
}

impl RegisterForm {
    #[must_use]
    pub fn new(session: Arc<SessionHolder>) -> Self {
        Self {
            session,
            core: FormCore::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.core.state()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.core.is_busy()
    }

    /// # Errors
    /// Returns the per-field failures.
    pub fn validate(input: &RegisterInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "firstName", &input.first_name);
        check_name(&mut errors, "lastName", &input.last_name);
        check_email(&mut errors, "email", &input.email);
        check_password(&mut errors, "password", input.password.expose_secret());
        check_confirmation(
            &mut errors,
            "confirmPassword",
            input.password.expose_secret(),
            input.confirm_password.expose_secret(),
        );
        if input.role.is_none() {
            errors.add("role", ROLE_REQUIRED);
        }
        if !input.accept_terms {
            errors.add("acceptTerms", TERMS_REQUIRED);
        }
        errors.into_result()
    }

    /// Creates the account and signs in with the returned session. The
    /// confirmation and terms flag stay client-side.
    pub async fn submit(&self, input: RegisterInput) -> FormState {
        let Some(_busy) = self.core.try_begin() else {
            return FormState::Busy;
        };

        if let Err(errors) = Self::validate(&input) {
            return self.core.set(FormState::Invalid(errors));
        }
        let Some(role) = input.role else {
            return self.core.set(FormState::Error(REGISTRATION_FAILED.to_string()));
        };

        let request = RegisterRequest {
            email: input.email.trim().to_string(),
            password: input.password.expose_secret().to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            phone: input.phone(),
            role,
        };

        match self.session.register(&request).await {
            Ok(user) => self.core.set(FormState::Success(Feedback::redirect(
                format!("Welcome, {}", user.first_name),
                paths::DASHBOARD,
            ))),
            Err(err) => {
                warn!("registration failed: {err}");
                self.core
                    .set(FormState::Error(REGISTRATION_FAILED.to_string()))
            }
        }
    }
}
