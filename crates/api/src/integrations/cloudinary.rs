//! Cloudinary image/file hosting: signed uploads and deletions.

use async_trait::async_trait;
use serde::Deserialize;

use galeria_core::hashing::sha256_hex;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Media host returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    /// `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`;
    /// all three must be set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            cloud_name: super::env_opt("CLOUDINARY_CLOUD_NAME")?,
            api_key: super::env_opt("CLOUDINARY_API_KEY")?,
            api_secret: super::env_opt("CLOUDINARY_API_SECRET")?,
        })
    }
}

/// Cloudinary resource type of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    /// Documents and other non-image attachments.
    Raw,
}

impl ResourceKind {
    fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub secure_url: String,
    pub public_id: String,
    #[serde(default)]
    pub bytes: Option<i64>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
        kind: ResourceKind,
    ) -> Result<UploadedAsset, MediaError>;

    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> Result<(), MediaError>;
}

pub struct CloudinaryClient {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        Ok(Self {
            client: super::http_client()?,
            config,
        })
    }

    fn endpoint(&self, kind: ResourceKind, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/{action}",
            self.config.cloud_name,
            kind.as_str()
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(MediaError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Sign request parameters: sorted `k=v` pairs joined by `&`, followed by
/// the API secret, hashed with SHA-256.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    sha256_hex(format!("{joined}{api_secret}").as_bytes())
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
        kind: ResourceKind,
    ) -> Result<UploadedAsset, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [("folder", folder.to_string()), ("timestamp", timestamp.clone())];
        let signature = sign_params(&signed, &self.config.api_secret);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint(kind, "upload"))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> Result<(), MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = sign_params(&signed, &self.config.api_secret);

        let form = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature_algorithm", "sha256".to_string()),
            ("signature", signature),
        ];
        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
