//! Form controllers: one per page, each binding input validation to a backend
//! call and a small set of UI states.
//!
//! Every controller follows the same sequence on submit:
//!
//! 1. A submit while another is in flight returns [`FormState::Busy`] and calls
//!    nothing.
//! 2. Invalid input is reported per field as [`FormState::Invalid`] and the
//!    backend is not contacted.
//! 3. Otherwise the call runs and its outcome maps to [`FormState::Success`] or
//!    to the flow's generic [`FormState::Error`] message. The detailed error is
//!    logged, never shown.

pub mod link;
pub mod login;
pub mod password;
pub mod register;
pub mod validation;
pub mod verify_email;

pub use link::token_from_link;
pub use login::{LoginForm, LoginInput};
pub use password::{ForgotPasswordForm, ForgotPasswordInput, ResetPasswordForm, ResetPasswordInput};
pub use register::{RegisterForm, RegisterInput};
pub use validation::{FieldError, ValidationErrors};
pub use verify_email::{ResendVerificationForm, ResendVerificationInput, VerifyEmailFlow};

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

/// Message shown on success plus where the page should go next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub redirect: Option<String>,
}

impl Feedback {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            redirect: None,
        }
    }

    #[must_use]
    pub fn redirect(message: impl Into<String>, to: &str) -> Self {
        Self {
            message: message.into(),
            redirect: Some(to.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Busy,
    Invalid(ValidationErrors),
    Success(Feedback),
    Error(String),
}

impl FormState {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FormState::Success(_))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, FormState::Error(_) | FormState::Invalid(_))
    }
}

/// State and busy flag shared by every controller.
#[derive(Debug, Default)]
pub(crate) struct FormCore {
    state: Mutex<FormState>,
    busy: AtomicBool,
}

/// Clears the busy flag when the submission ends, however it ends.
pub(crate) struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl FormCore {
    pub(crate) fn with_state(state: FormState) -> Self {
        Self {
            state: Mutex::new(state),
            busy: AtomicBool::new(false),
        }
    }

    pub(crate) fn state(&self) -> FormState {
        self.lock().clone()
    }

    /// Stores `state` and hands a copy back to the caller.
    pub(crate) fn set(&self, state: FormState) -> FormState {
        *self.lock() = state.clone();
        state
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claims the busy flag; `None` means a submission is already running.
    pub(crate) fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        *self.lock() = FormState::Busy;
        Some(BusyGuard { busy: &self.busy })
    }

    /// Claims the busy flag only from `Idle`. The check and the move to
    /// `Busy` happen under the state lock, so once any run has started every
    /// later caller sees `Busy` or the outcome.
    pub(crate) fn begin_once(&self) -> Option<BusyGuard<'_>> {
        let mut state = self.lock();
        if *state != FormState::Idle {
            return None;
        }
        self.busy.store(true, Ordering::Release);
        *state = FormState::Busy;
        Some(BusyGuard { busy: &self.busy })
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_flag_is_exclusive_and_released() {
        let core = FormCore::default();
        assert_eq!(core.state(), FormState::Idle);

        let guard = core.try_begin();
        assert!(guard.is_some());
        assert!(core.is_busy());
        assert_eq!(core.state(), FormState::Busy);
        assert!(core.try_begin().is_none());

        drop(guard);
        assert!(!core.is_busy());
        assert!(core.try_begin().is_some());
    }

    #[test]
    fn begin_once_only_leaves_idle_once() {
        let core = FormCore::default();

        let guard = core.begin_once();
        assert!(guard.is_some());
        assert_eq!(core.state(), FormState::Busy);
        assert!(core.begin_once().is_none());
        assert_eq!(core.state(), FormState::Busy);

        core.set(FormState::Success(Feedback::message("done")));
        drop(guard);
        assert!(!core.is_busy());
        assert!(core.begin_once().is_none());
        assert!(core.state().is_success());

        let failed = FormCore::with_state(FormState::Error("no token".to_string()));
        assert!(failed.begin_once().is_none());
        assert!(!failed.is_busy());
    }

    #[test]
    fn state_helpers() {
        assert!(FormState::Success(Feedback::message("ok")).is_success());
        assert!(FormState::Error("nope".to_string()).is_error());
        assert!(FormState::Invalid(ValidationErrors::new()).is_error());
        assert!(!FormState::Busy.is_error());
        assert_eq!(
            Feedback::redirect("done", "/login").redirect.as_deref(),
            Some("/login")
        );
    }
}
