//! Session state for the client. The holder hydrates once from storage when it
//! is created, exposes derived auth state for guards and forms, and is the only
//! writer of the persisted session keys.
//!
//! Create one [`SessionHolder`] at startup and pass the `Arc` to whatever needs
//! it; there is no global instance.

use crate::{
    api::RequestError,
    auth::{
        client::AuthApi,
        store::{
            SessionStore, StorageError, AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS,
            USER_DATA_KEY,
        },
        types::{AuthResponse, LoginRequest, RegisterRequest, User},
    },
};
use secrecy::SecretString;
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    Request(RequestError),
    Storage(StorageError),
    NotAuthenticated,
}

impl fmt::Display for SessionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Request(err) => write!(formatter, "{err}"),
            SessionError::Storage(err) => write!(formatter, "{err}"),
            SessionError::NotAuthenticated => formatter.write_str("Not signed in"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Request(err) => Some(err),
            SessionError::Storage(err) => Some(err),
            SessionError::NotAuthenticated => None,
        }
    }
}

impl From<RequestError> for SessionError {
    fn from(err: RequestError) -> Self {
        SessionError::Request(err)
    }
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        SessionError::Storage(err)
    }
}

/// Point-in-time view of the session, the only input guards need.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub user: Option<User>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Default)]
struct SessionState {
    loading: bool,
    user: Option<User>,
}

pub struct SessionHolder {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    state: Mutex<SessionState>,
}

impl fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("SessionHolder")
            .field("loading", &state.loading)
            .field("user", &state.user.as_ref().map(|user| &user.id))
            .finish_non_exhaustive()
    }
}

/// Clears the loading flag however the operation exits.
struct LoadingGuard<'a> {
    holder: &'a SessionHolder,
}

impl<'a> LoadingGuard<'a> {
    fn start(holder: &'a SessionHolder) -> Self {
        holder.lock().loading = true;
        Self { holder }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.holder.lock().loading = false;
    }
}

impl SessionHolder {
    /// Creates the holder and hydrates it from `store`.
    ///
    /// Storage that does not hold a complete, parseable session is cleared and
    /// the holder starts signed out.
    pub fn init(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Arc<Self> {
        let holder = Arc::new(Self {
            api,
            store,
            state: Mutex::new(SessionState {
                loading: true,
                user: None,
            }),
        });

        let user = holder.hydrate();
        {
            let mut state = holder.lock();
            state.user = user;
            state.loading = false;
        }

        holder
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            loading: state.loading,
            user: state.user.clone(),
        }
    }

    /// Access token for authenticated calls, if a session exists.
    ///
    /// # Errors
    /// Returns a `StorageError` if storage cannot be read.
    pub fn access_token(&self) -> Result<Option<SecretString>, StorageError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        Ok(self.store.get(AUTH_TOKEN_KEY)?.map(SecretString::from))
    }

    /// Signs in and persists the new session.
    ///
    /// # Errors
    /// Returns `SessionError::Request` if the backend rejects the credentials,
    /// leaving the previous state untouched, or `SessionError::Storage` if the
    /// session could not be saved.
    pub async fn login(&self, request: &LoginRequest) -> Result<User, SessionError> {
        let _loading = LoadingGuard::start(self);
        let response = self.api.login(request).await?;
        info!(user_id = %response.user.id, "signed in");
        self.establish(response)
    }

    /// Creates an account and signs in with the session it returns.
    ///
    /// # Errors
    /// Same as [`SessionHolder::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, SessionError> {
        let _loading = LoadingGuard::start(self);
        let response = self.api.register(request).await?;
        info!(user_id = %response.user.id, "registered");
        self.establish(response)
    }

    /// Exchanges the stored refresh token for a new session.
    ///
    /// # Errors
    /// Returns `SessionError::NotAuthenticated` when no refresh token is
    /// stored, otherwise the same errors as [`SessionHolder::login`].
    pub async fn refresh(&self) -> Result<User, SessionError> {
        let refresh_token = self
            .store
            .get(REFRESH_TOKEN_KEY)?
            .filter(|_| self.is_authenticated())
            .ok_or(SessionError::NotAuthenticated)?;

        let _loading = LoadingGuard::start(self);
        let response = self.api.refresh_token(&refresh_token).await?;
        debug!(user_id = %response.user.id, "session refreshed");
        self.establish(response)
    }

    /// Drops the session from memory and storage.
    ///
    /// The in-memory state is always cleared; a storage failure is logged and
    /// the next hydration will discard whatever is left.
    pub fn logout(&self) {
        {
            let mut state = self.lock();
            state.user = None;
            state.loading = false;
        }
        if let Err(err) = self.store.remove_many(&SESSION_KEYS) {
            warn!("failed to clear stored session: {err}");
        }
        info!("signed out");
    }

    fn establish(&self, response: AuthResponse) -> Result<User, SessionError> {
        if let Err(err) = self.persist(&response) {
            warn!("failed to persist session: {err}");
            self.lock().user = None;
            if let Err(clear_err) = self.store.remove_many(&SESSION_KEYS) {
                warn!("failed to clear partial session: {clear_err}");
            }
            return Err(err.into());
        }

        self.lock().user = Some(response.user.clone());
        Ok(response.user)
    }

    fn persist(&self, response: &AuthResponse) -> Result<(), StorageError> {
        let user_data = serde_json::to_string(&response.user)
            .map_err(|err| StorageError::Io(format!("Failed to encode user: {err}")))?;
        self.store.set_many(&[
            (AUTH_TOKEN_KEY, response.token.as_str()),
            (REFRESH_TOKEN_KEY, response.refresh_token.as_str()),
            (USER_DATA_KEY, user_data.as_str()),
        ])
    }

    /// Reads the stored session. Returns the user only when all three keys are
    /// present and the user parses; any other non-empty combination is wiped.
    fn hydrate(&self) -> Option<User> {
        let stored = SESSION_KEYS
            .iter()
            .map(|key| self.store.get(key))
            .collect::<Result<Vec<_>, _>>();

        let reason = match stored.as_deref() {
            Ok([None, None, None]) => return None,
            Ok([Some(_), Some(_), Some(user_data)]) => {
                match serde_json::from_str::<User>(user_data) {
                    Ok(user) => {
                        debug!(user_id = %user.id, "session restored from storage");
                        return Some(user);
                    }
                    Err(err) => format!("user data does not parse: {err}"),
                }
            }
            Ok(_) => "session keys are out of sync".to_string(),
            Err(err) => err.to_string(),
        };

        warn!("discarding stored session: {reason}");
        if let Err(err) = self.store.remove_many(&SESSION_KEYS) {
            warn!("failed to clear stored session: {err}");
        }
        None
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
