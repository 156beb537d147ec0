use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};

use super::response::MessageResponse;
use super::{admin, contact, content};
use crate::auth::{PasswordHasher, TokenSigner};
use crate::config::DEFAULT_CONTACT_DAILY_LIMIT;
use crate::media::MediaHost;
use crate::notify::Notifier;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub media: Arc<dyn MediaHost>,
    pub notifier: Arc<dyn Notifier>,
    pub tokens: TokenSigner,
    pub passwords: PasswordHasher,
    /// Exposes `POST /signup`.
    pub signup_enabled: bool,
    pub contact_daily_limit: u32,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        media: Arc<dyn MediaHost>,
        notifier: Arc<dyn Notifier>,
        tokens: TokenSigner,
    ) -> Self {
        Self {
            store,
            media,
            notifier,
            tokens,
            passwords: PasswordHasher::default(),
            signup_enabled: false,
            contact_daily_limit: DEFAULT_CONTACT_DAILY_LIMIT,
        }
    }

    #[must_use]
    pub fn with_signup(mut self, enabled: bool) -> Self {
        self.signup_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_contact_daily_limit(mut self, limit: u32) -> Self {
        self.contact_daily_limit = limit;
        self
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello world"))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/portfolio", get(hello))
        // Content
        .route("/post", post(content::publish_content))
        .route("/update/{id}", put(content::update_content))
        .route("/delete/{id}", delete(content::delete_content))
        .route("/blog/{id}", get(content::get_content))
        .route("/blogs/{page}", get(content::list_contents))
        // Contact
        .route("/request", post(contact::submit_request))
        // Admin
        .route("/login", post(admin::login));

    if state.signup_enabled {
        router = router.route("/signup", post(admin::signup));
        tracing::info!("Signup route enabled");
    } else {
        tracing::info!("Signup route hidden");
    }

    router
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
