use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentKind, Language};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    pub language: Language,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub image: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "meta_tag")]
    pub tag: String,
    pub created_at: DateTime<Utc>,
    pub featured: bool,
    /// bm25 rank, only set on search results. Lower is more relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// A content row about to be inserted. `image` is already resolved to
/// whatever should be persisted (external URL or empty).
#[derive(Debug, Clone)]
pub struct NewContent {
    pub language: Language,
    pub kind: ContentKind,
    pub image: String,
    pub title: String,
    pub body: String,
    pub tag: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Filters and page for listing contents.
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    /// Keyword for full-text search. `None` lists chronologically.
    pub search: Option<String>,
    pub language: Language,
    pub kind: Option<ContentKind>,
    pub featured: Option<bool>,
    /// 1-based page number.
    pub page: u32,
}

impl ContentQuery {
    pub const PAGE_SIZE: u32 = 10;

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(Self::PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub phone: String,
    pub description: String,
    pub telegram: String,
    pub ip: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactRequest {
    pub name: String,
    pub lastname: String,
    pub phone: String,
    pub description: String,
    pub telegram: String,
    pub ip: String,
    pub created_at: DateTime<Utc>,
}
