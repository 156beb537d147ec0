use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::{Claims, extract_token_from_header};
use crate::error::Error;
use crate::server::AppState;

/// Extractor that requires a valid admin bearer token.
pub struct RequireAdmin(pub Claims);

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidToken,
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuth => "You did not input the token",
            AuthError::InvalidToken => "Invalid token",
            AuthError::TokenExpired => "Token expired",
        };

        let mut response = (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response();
        response.headers_mut().insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static("Bearer realm=\"portfolio\""),
        );
        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let raw_token = extract_token_from_header(auth_header).ok_or(AuthError::MissingAuth)?;

        let claims = state.tokens.verify(&raw_token).map_err(|e| match e {
            Error::TokenExpired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        tracing::debug!(username = %claims.username, "admin token accepted");

        Ok(RequireAdmin(claims))
    }
}
