use serde::{Deserialize, Serialize};

use crate::types::{ContactRequest, Content, ContentKind, Language};

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub language: Language,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// External URL, local file path to upload, or empty.
    #[serde(default)]
    pub image: String,
    pub title: String,
    pub body: String,
    #[serde(default, rename = "meta_tag")]
    pub tag: String,
    #[serde(default)]
    pub featured: bool,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default, rename = "type")]
    pub kind: Option<ContentKind>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "meta_tag")]
    pub tag: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
}

/// Query string of `GET /blogs/{page}`. Kept as raw strings so invalid
/// values produce our own error messages.
#[derive(Debug, Default, Deserialize)]
pub struct ListContentsParams {
    pub language: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub featured: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequestBody {
    pub name: String,
    pub lastname: String,
    pub phone: String,
    #[serde(default)]
    pub description: String,
    pub telegram: String,
}

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub message: String,
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedContentResponse {
    pub message: String,
    pub content: Content,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub request: ContactRequest,
}
