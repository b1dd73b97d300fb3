//! Route guards. Both are pure functions of a [`SessionSnapshot`]; they hold no
//! state and start no timers. They are UX only: real access control lives on
//! the API.

use crate::auth::{session::SessionSnapshot, types::UserRole};

pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const DASHBOARD: &str = "/dashboard";
    pub const UNAUTHORIZED: &str = "/unauthorized";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const REGISTER: &str = "/register";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session is still loading; render nothing yet.
    Pending,
    Allow,
    Redirect(String),
}

/// Protects content that needs a signed-in user, optionally with a role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequireAuth {
    pub required_role: Option<UserRole>,
    pub redirect_to: String,
}

impl Default for RequireAuth {
    fn default() -> Self {
        Self {
            required_role: None,
            redirect_to: paths::LOGIN.to_string(),
        }
    }
}

impl RequireAuth {
    #[must_use]
    pub fn with_role(role: UserRole) -> Self {
        Self {
            required_role: Some(role),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn decide(&self, session: &SessionSnapshot) -> GuardDecision {
        if session.loading {
            return GuardDecision::Pending;
        }

        let Some(user) = &session.user else {
            return GuardDecision::Redirect(self.redirect_to.clone());
        };

        match self.required_role {
            Some(role) if user.role != role => {
                GuardDecision::Redirect(paths::UNAUTHORIZED.to_string())
            }
            _ => GuardDecision::Allow,
        }
    }
}

/// Keeps signed-in users away from public-only pages such as login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicRoute {
    pub redirect_to: String,
}

impl Default for PublicRoute {
    fn default() -> Self {
        Self {
            redirect_to: paths::DASHBOARD.to_string(),
        }
    }
}

impl PublicRoute {
    #[must_use]
    pub fn decide(&self, session: &SessionSnapshot) -> GuardDecision {
        if session.loading {
            GuardDecision::Pending
        } else if session.is_authenticated() {
            GuardDecision::Redirect(self.redirect_to.clone())
        } else {
            GuardDecision::Allow
        }
    }
}
