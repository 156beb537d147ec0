use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::auth::{authenticate, register_admin};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, LoginResponse, SignupRequest};
use crate::server::response::{ApiError, ApiJson, MessageResponse};

pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> impl IntoResponse {
    match register_admin(
        state.store.as_ref(),
        &state.passwords,
        &req.username,
        &req.email,
        &req.password,
    ) {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Signed up successfully")),
        )),
        Err(Error::BadRequest(message)) => Err(ApiError::bad_request(message)),
        Err(Error::AlreadyExists) => Err(ApiError::bad_request(
            "An admin with this username or email already exists",
        )),
        Err(e) => {
            tracing::error!("Sign up failed: {e}");
            Err(ApiError::internal("Could not sign up. Try again later"))
        }
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    let admin = match authenticate(
        state.store.as_ref(),
        &state.passwords,
        &req.login,
        &req.password,
    ) {
        Ok(admin) => admin,
        Err(Error::InvalidCredentials) => {
            tracing::warn!("Failed login for '{}'", req.login);
            return Err(ApiError::bad_request("Invalid login or password"));
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            return Err(ApiError::internal("Could not log in. Try again later"));
        }
    };

    let token = state
        .tokens
        .issue(&admin.username, &admin.email)
        .map_err(|e| {
            tracing::error!("Could not generate token: {e}");
            ApiError::internal("Could not generate token")
        })?;

    tracing::info!("Admin '{}' logged in", admin.username);

    Ok::<_, ApiError>(Json(LoginResponse {
        message: "Logged in successfully".to_string(),
        token,
    }))
}
