use crate::server::response::ApiError;
use crate::types::{ContentKind, Language};

const MAX_EMAIL_LEN: usize = 254;

/// Checks the shape of an email address: one `@`, a non-empty local part
/// and a dotted domain, no whitespace.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email cannot exceed {MAX_EMAIL_LEN} characters"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Email cannot contain whitespace".to_string());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain '@'".to_string());
    };
    if local.is_empty() || domain.contains('@') {
        return Err("Email must have exactly one '@' and a local part".to_string());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err("Email domain is invalid".to_string());
    }
    Ok(())
}

pub fn validate_telegram_handle(handle: &str) -> Result<(), ApiError> {
    if handle.starts_with('@') && handle.len() > 1 {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            "The telegram username should start with '@'",
        ))
    }
}

pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::bad_request("Invalid blog ID"))
}

pub fn parse_page(raw: &str) -> Result<u32, ApiError> {
    raw.parse()
        .ok()
        .filter(|page| *page >= 1)
        .ok_or_else(|| ApiError::bad_request("Invalid page number"))
}

/// Absent or empty means English.
pub fn parse_language(raw: Option<&str>) -> Result<Language, ApiError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(Language::default()),
        Some(s) => Language::parse(s).ok_or_else(|| ApiError::bad_request("Invalid language")),
    }
}

pub fn parse_category(raw: Option<&str>) -> Result<Option<ContentKind>, ApiError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => ContentKind::parse(s)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request("Invalid category")),
    }
}

pub fn parse_featured(raw: Option<&str>) -> Result<Option<bool>, ApiError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(ApiError::bad_request("Invalid featured value")),
    }
}
