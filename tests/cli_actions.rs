//! Drives the `auth-portal` subcommands through argument parsing, dispatch
//! and execution against a mock auth API.

#![allow(clippy::unwrap_used)]

use anyhow::Result;
use auth_portal::cli::{actions::Action, commands, dispatch};
use serde_json::json;
use std::{fs, net::TcpListener, path::PathBuf};
use ulid::Ulid;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

struct Harness {
    server: MockServer,
    dir: PathBuf,
}

impl Harness {
    async fn start() -> Self {
        let dir = std::env::temp_dir().join(format!("auth-portal-cli-{}", Ulid::new()));
        Self {
            server: MockServer::start().await,
            dir,
        }
    }

    fn session_file(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    fn action(&self, args: &[&str]) -> Result<Action> {
        self.action_with_api_url(&format!("{}/api", self.server.uri()), args)
    }

    fn action_with_api_url(&self, api_url: &str, args: &[&str]) -> Result<Action> {
        let api_url = api_url.to_string();
        let session_file = self.session_file().display().to_string();
        let mut argv = vec![
            "auth-portal".to_string(),
            "--api-url".to_string(),
            api_url,
            "--session-file".to_string(),
            session_file,
        ];
        argv.extend(args.iter().map(ToString::to_string));

        temp_env::with_vars(
            [
                ("AUTH_PORTAL_PASSWORD", None::<&str>),
                ("AUTH_PORTAL_NEW_PASSWORD", None),
            ],
            || {
                let matches = commands::new().try_get_matches_from(argv)?;
                dispatch::handler(&matches)
            },
        )
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        self.action(args)?.execute().await
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": "u-1",
                "email": "a@b.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "role": "seller_landlord",
                "isVerified": false,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            },
            "token": "access-1",
            "refreshToken": "refresh-1"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_whoami_logout_cycle() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    mount_login(&harness.server, 1).await;

    assert!(harness.run(&["whoami"]).await.is_err());

    harness
        .run(&["login", "-e", "a@b.com", "-p", "12345678"])
        .await
        .unwrap();
    assert!(harness.session_file().exists());
    harness.run(&["whoami"]).await.unwrap();

    // Public pages turn signed-in users away without calling the API.
    let err = harness
        .run(&["login", "-e", "a@b.com", "-p", "12345678"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already signed in as a@b.com"));

    harness.run(&["logout"]).await.unwrap();
    assert!(harness.run(&["whoami"]).await.is_err());
    harness.run(&["logout"]).await.unwrap();
}

#[tokio::test]
async fn logout_and_whoami_ignore_unusable_api_url() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    mount_login(&harness.server, 1).await;

    harness
        .run(&["login", "-e", "a@b.com", "-p", "12345678"])
        .await
        .unwrap();

    harness
        .action_with_api_url("not a url", &["whoami"])
        .unwrap()
        .execute()
        .await
        .unwrap();

    harness
        .action_with_api_url("not a url", &["logout"])
        .unwrap()
        .execute()
        .await
        .unwrap();
    let stored = fs::read_to_string(harness.session_file()).unwrap();
    assert!(!stored.contains("auth_token"));
    assert!(!stored.contains("refresh_token"));
    assert!(!stored.contains("user_data"));
    assert!(harness.run(&["whoami"]).await.is_err());

    // Commands that need the backend still report the bad URL.
    let err = harness
        .action_with_api_url("not a url", &["refresh"])
        .unwrap()
        .execute()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid API base URL"));
}

#[tokio::test]
async fn invalid_login_input_fails_without_calls() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    mount_login(&harness.server, 0).await;

    let err = harness
        .run(&["login", "-e", "nope", "-p", "short"])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid input");
}

#[tokio::test]
async fn refresh_requires_a_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;

    let err = harness.run(&["refresh"]).await.unwrap_err();
    assert_eq!(err.to_string(), "Not signed in");
}

#[tokio::test]
async fn forgot_password_posts_email() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .and(body_json(json!({"email": "a@b.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness
        .run(&["forgot-password", "-e", " a@b.com "])
        .await
        .unwrap();
}

#[tokio::test]
async fn reset_password_uses_token_from_link() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .and(body_json(json!({"token": "tok-9", "newPassword": "87654321"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness
        .run(&[
            "reset-password",
            "--link",
            "https://app.example.com/reset-password/tok-9",
            "--new-password",
            "87654321",
        ])
        .await
        .unwrap();

    let err = harness
        .run(&["reset-password", "--new-password", "87654321"])
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "This password reset link is invalid or missing."
    );
}

#[tokio::test]
async fn verify_email_failure_is_reported() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify-email"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let err = harness
        .run(&["verify-email", "--token", "old"])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired verification link.");
}

#[tokio::test]
async fn health_reports_status() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let harness = Harness::start().await;
    assert!(harness.run(&["health"]).await.is_err());

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&harness.server)
        .await;
    harness.run(&["health"]).await.unwrap();
}
