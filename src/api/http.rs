//! HTTP helpers for the auth API with a single timeout policy and error shape.
//! Feature clients call these instead of building requests themselves. The
//! helpers attach whatever bearer token a caller passes but never log it, and
//! spans only record the method and path.

use super::{
    config::ApiConfig,
    errors::{ApiErrorBody, RequestError},
};
use crate::APP_USER_AGENT;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::to_string;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Reusable connection to the auth API base URL.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Builds a client for the configured base URL.
    ///
    /// # Errors
    /// Returns `RequestError::Config` if the base URL is not an absolute URL or
    /// the underlying client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, RequestError> {
        let base_url = config.base_url.trim();
        Url::parse(base_url).map_err(|err| {
            RequestError::Config(format!("Invalid API base URL '{base_url}': {err}"))
        })?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| RequestError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches JSON, appending `query` pairs with proper percent-encoding.
    ///
    /// # Errors
    /// Returns a `RequestError` on transport failure, non-2xx status or an
    /// undecodable body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RequestError> {
        let url = build_url_with_base(&self.base_url, path);
        let request = self.client.get(&url).query(query);
        let response = send("GET", path, request).await?;

        handle_json_response(response).await
    }

    /// Issues a GET and only checks for a 2xx status.
    ///
    /// # Errors
    /// Returns a `RequestError` on transport failure or non-2xx status.
    pub async fn get_empty(&self, path: &str) -> Result<(), RequestError> {
        let url = build_url_with_base(&self.base_url, path);
        let response = send("GET", path, self.client.get(&url)).await?;

        handle_empty_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns a `RequestError` if the body cannot be encoded, the request
    /// fails, or the response is not a decodable 2xx.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RequestError> {
        let url = build_url_with_base(&self.base_url, path);
        let payload = to_string(body)
            .map_err(|err| RequestError::Serialization(format!("Failed to encode request: {err}")))?;
        let request = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload);
        let response = send("POST", path, request).await?;

        handle_json_response(response).await
    }

    /// Posts without a body, authenticating with `Authorization: Bearer`.
    ///
    /// # Errors
    /// Returns a `RequestError` on transport failure or when the response is
    /// not a decodable 2xx.
    pub async fn post_with_bearer<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: &str,
    ) -> Result<T, RequestError> {
        let url = build_url_with_base(&self.base_url, path);
        let request = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(bearer);
        let response = send("POST", path, request).await?;

        handle_json_response(response).await
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

async fn send(
    method: &'static str,
    path: &str,
    request: RequestBuilder,
) -> Result<Response, RequestError> {
    let span = info_span!("auth_api.request", http.method = method, http.path = %path);
    let response = request
        .send()
        .instrument(span)
        .await
        .map_err(map_request_error)?;

    debug!(http.status = response.status().as_u16(), "auth API responded");
    Ok(response)
}

/// Maps transport errors into `RequestError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        RequestError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with the backend's message.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| RequestError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

async fn handle_empty_response(response: Response) -> Result<(), RequestError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> RequestError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    RequestError::Http {
        status,
        message: error_message(&body),
    }
}

/// Picks the user-facing message out of an error body.
///
/// A JSON body with a `message` wins; JSON without one reads as a generic
/// failure, and anything that is not JSON is reported as a network error.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            message: Some(message),
            ..
        }) if !message.trim().is_empty() => sanitize_message(&message),
        Ok(_) => "Request failed".to_string(),
        Err(_) => "Network error".to_string(),
    }
}

fn sanitize_message(message: &str) -> String {
    message.trim().chars().take(MAX_ERROR_CHARS).collect()
}
