use crate::{
    api::ApiConfig,
    auth::{AuthApi, AuthClient, FileStore, SessionHolder, UnavailableApi},
    cli::commands::session,
};
use anyhow::Result;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::debug;

/// Connection and storage settings every action needs.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, session_file: PathBuf) -> Self {
        Self {
            api_url,
            session_file,
            timeout: ApiConfig::default().timeout,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }

    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn client(&self) -> Result<Arc<AuthClient>> {
        Ok(Arc::new(AuthClient::new(&self.api_config())?))
    }

    /// Hydrates the session from the session file.
    #[must_use]
    pub fn session(&self, api: Arc<dyn AuthApi>) -> Arc<SessionHolder> {
        SessionHolder::init(api, Arc::new(FileStore::new(self.session_file.clone())))
    }

    /// Hydrates the session for commands that never call the backend. A bad
    /// API URL does not stop them from reading or clearing the session file.
    #[must_use]
    pub fn stored_session(&self) -> Arc<SessionHolder> {
        let api: Arc<dyn AuthApi> = match AuthClient::new(&self.api_config()) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                debug!("continuing without an API client: {err}");
                Arc::new(UnavailableApi::new(err))
            }
        };
        self.session(api)
    }
}

impl From<session::Options> for GlobalArgs {
    fn from(options: session::Options) -> Self {
        Self::new(options.api_url, options.session_file).with_timeout(options.timeout)
    }
}
