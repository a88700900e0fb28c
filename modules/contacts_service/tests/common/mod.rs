//! Shared harness: in-memory SQLite, recording mail and a fake avatar store

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use contacts_service::domain::{AvatarStorage, Notification, Notifier};
use contacts_service::lifecycle::SchemaMigrator;
use contacts_service::{AppConfig, ContactsServiceModule};
use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Notifier that keeps every notification it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    /// Wait until `count` notifications were sent; they are delivered from
    /// spawned tasks
    pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
        for _ in 0..200 {
            if self.sent.lock().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

/// Avatar store answering with a predictable CDN URL
#[derive(Default)]
pub struct FakeAvatars {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl AvatarStorage for FakeAvatars {
    async fn upload(&self, public_id: &str, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        self.uploads
            .lock()
            .push((public_id.to_string(), file_name.to_string(), bytes.len()));
        Ok(format!("https://cdn.test/{public_id}"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub module: ContactsServiceModule,
    pub mail: Arc<RecordingNotifier>,
    pub avatars: Arc<FakeAvatars>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "test-secret".to_string();
    config.security.bcrypt_cost = 4;
    config.database.url = "sqlite::memory:".to_string();
    config
}

pub async fn test_app() -> TestApp {
    test_app_with(test_config()).await
}

pub async fn test_app_with(config: AppConfig) -> TestApp {
    // A single pooled connection keeps the in-memory database alive and shared
    let mut options = ConnectOptions::new(config.database.url.clone());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    let mail = Arc::new(RecordingNotifier::default());
    let avatars = Arc::new(FakeAvatars::default());
    let module =
        ContactsServiceModule::with_integrations(config, db, mail.clone(), avatars.clone()).unwrap();
    module.migrator().migrate().await.unwrap();

    TestApp {
        router: module.router(),
        module,
        mail,
        avatars,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, token, None)).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/api/auth/register",
            None,
            json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let form = format!("username={username}&password={password}");
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(request).await
    }

    /// Confirm an address directly with a freshly minted email token
    pub async fn confirm(&self, email: &str) {
        let token = self
            .module
            .users()
            .tokens()
            .create_email_token(email)
            .unwrap();
        let response = self
            .get(&format!("/api/auth/confirmed_email/{token}"), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    /// Register, confirm and log in; returns the access token
    pub async fn signed_in(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        let response = self.register(username, &email, "secret123").await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.confirm(&email).await;
        let response = self.login(username, "secret123").await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn contact_body(first_name: &str, email: &str, phone: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Tester",
        "email": email,
        "phone_number": phone,
        "birth_date": null,
        "info": "met at a conference"
    })
}
