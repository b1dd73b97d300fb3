//! Client wrappers for the auth API endpoints. Session state and form
//! controllers depend on the [`AuthApi`] trait rather than on HTTP directly,
//! so every flow can run against a fake backend.

use crate::{
    api::{ApiConfig, HttpClient, RequestError},
    auth::types::{
        AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
        ResendVerificationRequest, ResetPasswordRequest,
    },
};
use async_trait::async_trait;
use tracing::warn;

/// One method per backend action. Failures are surfaced immediately; nothing
/// here retries.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, RequestError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, RequestError>;

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, RequestError>;

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, RequestError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, RequestError>;

    async fn verify_email(&self, token: &str) -> Result<MessageResponse, RequestError>;

    async fn resend_verification(
        &self,
        request: &ResendVerificationRequest,
    ) -> Result<MessageResponse, RequestError>;

    async fn health_check(&self) -> Result<(), RequestError>;

    /// Collapses [`AuthApi::health_check`] into a yes/no answer.
    async fn is_healthy(&self) -> bool {
        match self.health_check().await {
            Ok(()) => true,
            Err(err) => {
                warn!("auth API health check failed: {err}");
                false
            }
        }
    }
}

/// [`AuthApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    /// # Errors
    /// Returns `RequestError::Config` if the base URL is invalid.
    pub fn new(config: &ApiConfig) -> Result<Self, RequestError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    /// Exchanges credentials for a session. Must never log the password.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, RequestError> {
        self.http.post_json("/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, RequestError> {
        self.http.post_json("/auth/register", request).await
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.http.post_json("/auth/forgot-password", request).await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.http.post_json("/auth/reset-password", request).await
    }

    /// Trades the refresh token, sent as a bearer credential, for a new session.
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, RequestError> {
        self.http
            .post_with_bearer("/auth/refresh", refresh_token)
            .await
    }

    async fn verify_email(&self, token: &str) -> Result<MessageResponse, RequestError> {
        self.http
            .get_json("/auth/verify-email", &[("token", token)])
            .await
    }

    /// Requests a new verification email without leaking account existence.
    async fn resend_verification(
        &self,
        request: &ResendVerificationRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.http
            .post_json("/auth/resend-verification", request)
            .await
    }

    async fn health_check(&self) -> Result<(), RequestError> {
        self.http.get_empty("/health").await
    }
}

/// Stands in for [`AuthClient`] when none could be built, so commands that
/// only touch the stored session still work. Every call fails with the error
/// that prevented building the client.
#[derive(Clone, Debug)]
pub struct UnavailableApi {
    reason: RequestError,
}

impl UnavailableApi {
    #[must_use]
    pub fn new(reason: RequestError) -> Self {
        Self { reason }
    }

    fn fail<T>(&self) -> Result<T, RequestError> {
        Err(self.reason.clone())
    }
}

#[async_trait]
impl AuthApi for UnavailableApi {
    async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse, RequestError> {
        self.fail()
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<AuthResponse, RequestError> {
        self.fail()
    }

    async fn forgot_password(
        &self,
        _request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.fail()
    }

    async fn reset_password(
        &self,
        _request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.fail()
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<AuthResponse, RequestError> {
        self.fail()
    }

    async fn verify_email(&self, _token: &str) -> Result<MessageResponse, RequestError> {
        self.fail()
    }

    async fn resend_verification(
        &self,
        _request: &ResendVerificationRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.fail()
    }

    async fn health_check(&self) -> Result<(), RequestError> {
        self.fail()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::types::UserRole;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn session_body() -> serde_json::Value {
        json!({
            "user": {
                "id": "u-1",
                "email": "a@b.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "role": "buyer_renter",
                "isVerified": true,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            },
            "token": "access-1",
            "refreshToken": "refresh-1"
        })
    }

    #[tokio::test]
    async fn register_posts_camel_case_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({
                "email": "a@b.com",
                "password": "12345678",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "phone": "555",
                "role": "buyer_renter"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(session_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&ApiConfig::new(server.uri())).unwrap();
        let response = client
            .register(&RegisterRequest {
                email: "a@b.com".to_string(),
                password: "12345678".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone: Some("555".to_string()),
                role: UserRole::BuyerRenter,
            })
            .await
            .unwrap();

        assert_eq!(response.token, "access-1");
        assert_eq!(response.refresh_token, "refresh-1");
        assert_eq!(response.user.email, "a@b.com");
    }

    #[tokio::test]
    async fn refresh_sends_bearer_refresh_token() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(header("authorization", "Bearer refresh-0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&ApiConfig::new(server.uri())).unwrap();
        let response = client.refresh_token("refresh-0").await.unwrap();
        assert_eq!(response.token, "access-1");
    }

    #[tokio::test]
    async fn verify_email_uses_query_token() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/verify-email"))
            .and(query_param("token", "tok-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Email verified"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&ApiConfig::new(server.uri())).unwrap();
        let response = client.verify_email("tok-1").await.unwrap();
        assert_eq!(response.message, "Email verified");
    }

    #[tokio::test]
    async fn health_reports_status() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = AuthClient::new(&ApiConfig::new(server.uri())).unwrap();
        let err = client.health_check().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(!client.is_healthy().await);
    }

    #[tokio::test]
    async fn unavailable_api_fails_every_call_with_build_error() {
        let reason = AuthClient::new(&ApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(reason, RequestError::Config(_)));

        let api = UnavailableApi::new(reason.clone());
        assert_eq!(api.refresh_token("refresh-0").await.unwrap_err(), reason);
        assert_eq!(api.verify_email("tok-1").await.unwrap_err(), reason);
        assert!(!api.is_healthy().await);
    }
}
