use crate::{
    auth::{guards::paths, session::SessionHolder, types::LoginRequest},
    forms::{
        validation::{check_email, check_password, ValidationErrors},
        Feedback, FormCore, FormState,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::warn;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[derive(Clone, Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: SecretString,
    pub remember_me: bool,
}

impl LoginInput {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
            remember_me: false,
        }
    }
}

pub struct LoginForm {
    session: Arc<SessionHolder>,
    core: FormCore,
}

impl LoginForm {
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
    pub fn validate(input: &LoginInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &input.email);
        check_password(&mut errors, "password", input.password.expose_secret());
        errors.into_result()
    }

    /// Signs in through the session holder; success points at the dashboard.
    pub async fn submit(&self, input: LoginInput) -> FormState {
        let Some(_busy) = self.core.try_begin() else {
            return FormState::Busy;
        };

        if let Err(errors) = Self::validate(&input) {
            return self.core.set(FormState::Invalid(errors));
        }

        let request = LoginRequest {
            email: input.email.trim().to_string(),
            password: input.password.expose_secret().to_string(),
            remember_me: Some(input.remember_me),
        };

        match self.session.login(&request).await {
            Ok(user) => self.core.set(FormState::Success(Feedback::redirect(
                format!("Signed in as {}", user.email),
                paths::DASHBOARD,
            ))),
            Err(err) => {
                warn!("login failed: {err}");
                self.core.set(FormState::Error(LOGIN_FAILED.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        api::RequestError,
        auth::{
            session::tests::FakeApi,
            store::{MemoryStore, AUTH_TOKEN_KEY},
            SessionStore,
        },
        forms::validation::{INVALID_EMAIL, PASSWORD_TOO_SHORT},
    };

    fn form_with(api: Arc<FakeApi>) -> (LoginForm, Arc<SessionHolder>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = SessionHolder::init(api, store.clone());
        (LoginForm::new(session.clone()), session, store)
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_backend() {
        let api = Arc::new(FakeApi::default());
        let (form, session, _) = form_with(api.clone());

        let state = form.submit(LoginInput::new("not-an-email", "short")).await;
        let FormState::Invalid(errors) = state else {
            panic!("expected invalid state, got {state:?}");
        };
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
        assert_eq!(errors.get("password"), Some(PASSWORD_TOO_SHORT));
        assert_eq!(api.calls(), 0);
        assert!(!session.is_authenticated());
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn success_redirects_to_dashboard() {
        let api = Arc::new(FakeApi::default());
        let (form, session, store) = form_with(api.clone());

        let state = form.submit(LoginInput::new(" a@b.com ", "12345678")).await;
        assert_eq!(
            state,
            FormState::Success(Feedback::redirect("Signed in as a@b.com", "/dashboard"))
        );
        assert_eq!(form.state(), state);
        assert_eq!(api.calls(), 1);
        assert!(session.is_authenticated());
        assert!(store.get(AUTH_TOKEN_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn backend_failure_shows_generic_message() {
        let api = Arc::new(FakeApi::failing(RequestError::Http {
            status: 401,
            message: "Invalid credentials".to_string(),
        }));
        let (form, session, _) = form_with(api.clone());

        let state = form.submit(LoginInput::new("a@b.com", "12345678")).await;
        assert_eq!(state, FormState::Error(LOGIN_FAILED.to_string()));
        assert!(!session.is_authenticated());
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn concurrent_submit_is_rejected() {
        let api = Arc::new(FakeApi::default());
        let (form, _, _) = form_with(api.clone());

        let _busy = form.core.try_begin();
        let state = form.submit(LoginInput::new("a@b.com", "12345678")).await;
        assert_eq!(state, FormState::Busy);
        assert_eq!(api.calls(), 0);
    }
}
