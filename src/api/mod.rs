//! Shared transport for the auth API: configuration, HTTP helpers and the
//! request error type.
//!
//! Centralizing these keeps network behavior consistent and avoids duplicated
//! request setup in feature code. Nothing here stores secrets, but callers
//! must still avoid logging the bodies they send.

pub mod config;
pub mod errors;
pub mod http;

pub use config::ApiConfig;
pub use errors::{ApiErrorBody, RequestError};
pub use http::HttpClient;
