use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use portfolio::auth::{PasswordHasher, TokenSigner, register_admin};
use portfolio::config::DEFAULT_CONTACT_DAILY_LIMIT;
use portfolio::error::{Error, Result};
use portfolio::media::{MediaHost, is_external_url};
use portfolio::notify::Notifier;
use portfolio::server::{AppState, create_router};
use portfolio::store::{SqliteStore, Store};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PEER_IP: [u8; 4] = [127, 0, 0, 1];
pub const MEDIA_BASE: &str = "https://media.test";

/// Media host that "uploads" by recording the path.
#[derive(Default)]
pub struct FakeMediaHost {
    pub uploads: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload_image(&self, path: &Path) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push(path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(format!("{MEDIA_BASE}/uploads/{name}"))
    }

    fn build_url(&self, public_id: &str) -> String {
        if public_id.is_empty() || is_external_url(public_id) {
            public_id.to_string()
        } else {
            format!("{MEDIA_BASE}/{public_id}")
        }
    }
}

/// Notifier that keeps messages in memory, or fails every send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Notify("chat not found".into()));
        }
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

pub struct TestOptions {
    pub signup_enabled: bool,
    pub contact_daily_limit: u32,
    pub notifier_fails: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            signup_enabled: true,
            contact_daily_limit: DEFAULT_CONTACT_DAILY_LIMIT,
            notifier_fails: false,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub www_authenticate: Option<String>,
}

/// The full router wired to a temp database and fake collaborators,
/// driven in-process.
pub struct TestServer {
    pub temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
    pub media: Arc<FakeMediaHost>,
    pub notifier: Arc<RecordingNotifier>,
    pub state: Arc<AppState>,
    router: Router,
}

impl TestServer {
    pub fn start() -> Self {
        Self::start_with(TestOptions::default())
    }

    pub fn start_with(options: TestOptions) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("portfolio.db")).expect("open store"));
        store.initialize().expect("initialize store");

        let media = Arc::new(FakeMediaHost::default());
        let notifier = Arc::new(RecordingNotifier {
            fail: options.notifier_fails,
            ..Default::default()
        });

        let state = Arc::new(
            AppState::new(
                store.clone(),
                media.clone(),
                notifier.clone(),
                TokenSigner::new(JWT_SECRET).expect("token signer"),
            )
            .with_signup(options.signup_enabled)
            .with_contact_daily_limit(options.contact_daily_limit),
        );

        let router = create_router(state.clone())
            .layer(MockConnectInfo(SocketAddr::from((PEER_IP, 40000))));

        Self {
            temp_dir,
            store,
            media,
            notifier,
            state,
            router,
        }
    }

    /// Registers an admin straight in the store and returns a fresh token.
    pub fn admin_token(&self) -> String {
        register_admin(
            self.store.as_ref(),
            &PasswordHasher::new(),
            "owner",
            "owner@example.com",
            "correct horse",
        )
        .expect("register admin");
        self.state
            .tokens
            .issue("owner", "owner@example.com")
            .expect("issue token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let www_authenticate = response
            .headers()
            .get("www-authenticate")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));

        TestResponse {
            status,
            body,
            www_authenticate,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, &[], None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, &[], Some(body)).await
    }

    pub async fn post_as(&self, token: &str, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, &[("authorization", token)], Some(body))
            .await
    }

    pub async fn put_as(&self, token: &str, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, &[("authorization", token)], Some(body))
            .await
    }

    pub async fn delete_as(&self, token: &str, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, &[("authorization", token)], None)
            .await
    }

    /// Publishes a post and returns its id.
    pub async fn publish(&self, token: &str, body: Value) -> i64 {
        let response = self.post_as(token, "/post", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("content id")
    }
}
