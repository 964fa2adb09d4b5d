use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use crate::shared::clients::media_host::{ImageUpload, MediaHost, UploadedImage};
use crate::shared::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

// Cloudinary API 클라이언트
// Cloudinary REST client (signed upload / destroy)
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    base_url: String,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResult {
    result: String,
}

impl CloudinaryClient {
    // 클라이언트 생성
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: format!("{}/{}", API_BASE, config.cloud_name),
            config,
        })
    }

    fn ensure_configured(&self) -> Result<()> {
        if !self.config.is_configured() {
            bail!("Cloudinary credentials are not configured");
        }
        Ok(())
    }

    /// 요청 서명: 정렬된 파라미터 + api_secret 의 SHA-256
    /// Sign sorted `key=value` pairs joined by `&`, followed by the API secret
    pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let payload = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Cloudinary {} returned error: {} - {}", what, status, body);
        }
        Ok(response)
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage> {
        self.ensure_configured()?;

        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::sign(
            &[("folder", self.config.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let file = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .context("Invalid image content type")?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("signature", signature);

        debug!("Uploading image to Cloudinary folder {}", self.config.folder);

        let response = self
            .http_client
            .post(format!("{}/image/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("Failed to send upload request to Cloudinary")?;

        let result: UploadResult = Self::check_status(response, "upload")
            .await?
            .json()
            .await
            .context("Failed to parse Cloudinary upload response")?;

        info!("Uploaded image {}", result.public_id);
        Ok(UploadedImage {
            url: result.secure_url,
            public_id: result.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.ensure_configured()?;

        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let response = self
            .http_client
            .post(format!("{}/image/destroy", self.base_url))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .context("Failed to send destroy request to Cloudinary")?;

        let result: DestroyResult = Self::check_status(response, "destroy")
            .await?
            .json()
            .await
            .context("Failed to parse Cloudinary destroy response")?;

        // "not found"도 삭제된 것으로 취급
        if result.result != "ok" && result.result != "not found" {
            bail!("Cloudinary destroy failed for {}: {}", public_id, result.result);
        }
        info!("Deleted image {}", public_id);
        Ok(())
    }
}
