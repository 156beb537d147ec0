use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use crate::notify::contact_message;
use crate::server::AppState;
use crate::server::client_ip::ClientIp;
use crate::server::dto::{ContactRequestBody, ContactResponse};
use crate::server::response::{ApiError, ApiJson, StoreResultExt};
use crate::server::validation::validate_telegram_handle;
use crate::types::NewContactRequest;

pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<ContactRequestBody>,
) -> impl IntoResponse {
    if [&req.name, &req.lastname, &req.phone, &req.telegram]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(ApiError::bad_request(
            "name, lastname, phone and telegram are required",
        ));
    }
    validate_telegram_handle(req.telegram.trim())?;

    let now = Utc::now();
    let sent_today = state
        .store
        .count_contact_requests_on(&ip, now.date_naive())
        .api_err("Database error")?;
    if sent_today >= i64::from(state.contact_daily_limit) {
        tracing::warn!("Contact quota reached for {ip}");
        return Err(ApiError::too_many_requests(format!(
            "Daily request limit reached ({} per day)",
            state.contact_daily_limit
        )));
    }

    let request = state
        .store
        .create_contact_request(&NewContactRequest {
            name: req.name,
            lastname: req.lastname,
            phone: req.phone,
            description: req.description,
            telegram: req.telegram.trim().to_string(),
            ip,
            created_at: now,
        })
        .api_err("Could not save the request")?;

    tracing::info!("Saved contact request #{} from {}", request.id, request.ip);

    // The row stays committed even if the notification fails.
    if let Err(e) = state.notifier.notify(&contact_message(&request)).await {
        tracing::error!("Failed to send Telegram notification: {e}");
        return Err(ApiError::internal("Failed to send Telegram notification"));
    }

    Ok::<_, ApiError>(Json(ContactResponse {
        message: "Your request was sent successfully".to_string(),
        request,
    }))
}
