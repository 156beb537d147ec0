use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{MediaHost, is_external_url};
use crate::error::{Error, Result};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DELIVERY_BASE: &str = "https://res.cloudinary.com";
pub const DEFAULT_FOLDER: &str = "portfolio_uploads";

/// Account credentials parsed from a `cloudinary://<key>:<secret>@<cloud>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl FromStr for CloudinaryCredentials {
    type Err = Error;

    fn from_str(url: &str) -> Result<Self> {
        let invalid = || {
            Error::Config("CLOUDINARY_URL must look like cloudinary://<key>:<secret>@<cloud>".into())
        };

        let rest = url.trim().strip_prefix("cloudinary://").ok_or_else(invalid)?;
        let (credentials, cloud_name) = rest.rsplit_once('@').ok_or_else(invalid)?;
        let (api_key, api_secret) = credentials.split_once(':').ok_or_else(invalid)?;
        let cloud_name = cloud_name.split(['?', '/']).next().unwrap_or_default();

        if api_key.is_empty() || api_secret.is_empty() || cloud_name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Signs upload parameters: `k1=v1&k2=v2` sorted by key, secret appended,
/// SHA-256, hex encoded.
fn signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut params = params.to_vec();
    params.sort_by_key(|(key, _)| *key);

    let payload = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cloudinary-backed [`MediaHost`] using signed uploads.
pub struct Cloudinary {
    client: Client,
    credentials: CloudinaryCredentials,
    folder: String,
}

impl Cloudinary {
    pub fn new(credentials: CloudinaryCredentials, folder: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            credentials,
            folder: folder.into(),
        })
    }

    pub fn from_url(url: &str, folder: impl Into<String>) -> Result<Self> {
        Self::new(url.parse()?, folder)
    }

    fn upload_endpoint(&self) -> String {
        format!("{API_BASE}/{}/image/upload", self.credentials.cloud_name)
    }
}

#[async_trait]
impl MediaHost for Cloudinary {
    async fn upload_image(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = Utc::now().timestamp().to_string();
        let signature = signature(
            &[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.credentials.api_secret,
        );

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("api_key", self.credentials.api_key.clone())
            .text("folder", self.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let resp = self
            .client
            .post(self.upload_endpoint())
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "no details provided".into());
            return Err(Error::Media(format!("upload failed ({status}): {message}")));
        }

        let uploaded: UploadResponse = resp.json().await?;
        tracing::info!("Uploaded {} to {}", path.display(), uploaded.secure_url);

        Ok(uploaded.secure_url)
    }

    fn build_url(&self, public_id: &str) -> String {
        if public_id.is_empty() || is_external_url(public_id) {
            return public_id.to_string();
        }

        format!(
            "{DELIVERY_BASE}/{}/image/upload/{}",
            self.credentials.cloud_name,
            public_id.trim_start_matches('/')
        )
    }
}
