//! Image hosting on an external media service.
//!
//! Content rows store either an external URL or an asset identifier; the
//! [`MediaHost`] turns local files into hosted URLs and identifiers into
//! URLs.

mod cloudinary;

pub use cloudinary::{Cloudinary, CloudinaryCredentials, DEFAULT_FOLDER};

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Error, Result};

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Uploads a local image file and returns the external URL of the asset.
    async fn upload_image(&self, path: &Path) -> Result<String>;

    /// Returns the external URL for a previously uploaded asset.
    fn build_url(&self, public_id: &str) -> String;
}

#[must_use]
pub fn is_external_url(image: &str) -> bool {
    image.starts_with("http://") || image.starts_with("https://")
}

/// Resolves an image reference from a request into what gets stored.
/// Empty values and external URLs are kept; anything else is a local path
/// and is uploaded.
pub async fn resolve_image(media: &dyn MediaHost, image: &str) -> Result<String> {
    let image = image.trim();
    if image.is_empty() || is_external_url(image) {
        return Ok(image.to_string());
    }

    media.upload_image(Path::new(image)).await
}

/// Media host used when no hosting service is configured. Uploads fail;
/// stored references are returned unchanged.
pub struct NoMediaHost;

#[async_trait]
impl MediaHost for NoMediaHost {
    async fn upload_image(&self, path: &Path) -> Result<String> {
        Err(Error::Media(format!(
            "no media host configured, cannot upload {}",
            path.display()
        )))
    }

    fn build_url(&self, public_id: &str) -> String {
        public_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_url() {
        assert!(is_external_url("https://res.cloudinary.com/x/image/upload/a.png"));
        assert!(is_external_url("http://example.com/a.png"));
        assert!(!is_external_url("./uploads/a.png"));
        assert!(!is_external_url("httpdocs/a.png"));
    }

    #[tokio::test]
    async fn test_resolve_keeps_urls_and_empty() {
        let url = "https://example.com/a.png";
        assert_eq!(resolve_image(&NoMediaHost, url).await.unwrap(), url);
        assert_eq!(resolve_image(&NoMediaHost, "  ").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_resolve_uploads_local_paths() {
        let result = resolve_image(&NoMediaHost, "/tmp/cover.png").await;
        assert!(matches!(result, Err(Error::Media(_))));
    }
}
