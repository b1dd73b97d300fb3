//! Auth feature module: backend calls, the persisted session and route guards.
//! It keeps authentication logic out of the presentation layer and touches
//! security boundaries, so it must avoid logging secrets or token material.
//!
//! Flow overview: login and register return a session (user, access token,
//! refresh token) that the [`session::SessionHolder`] persists as one unit.
//! Refresh trades the refresh token for a new session. Password reset and
//! email verification are token-in-link flows that never touch the session.

pub mod client;
pub mod guards;
pub mod session;
pub mod store;
pub mod types;

pub use client::{AuthApi, AuthClient, UnavailableApi};
pub use guards::{GuardDecision, PublicRoute, RequireAuth};
pub use session::{SessionError, SessionHolder, SessionSnapshot};
pub use store::{FileStore, MemoryStore, SessionStore, StorageError};
pub use types::{User, UserRole};
