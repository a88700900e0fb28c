//! Cloudinary-backed avatar storage

use crate::config::{CloudinaryConfig, SignatureAlgorithm};
use crate::domain::avatar::AvatarStorage;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

const API_BASE: &str = "https://api.cloudinary.com";
const AVATAR_SIZE: u32 = 250;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    version: u64,
}

/// Uploads avatars with signed Cloudinary requests
pub struct CloudinaryStorage {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

/// Request signature: sorted `key=value` pairs joined by `&`, then the secret
pub fn sign(params: &[(&str, String)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let payload = format!("{joined}{api_secret}");
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

/// Square, cropped delivery URL for an uploaded avatar
pub fn delivery_url(cloud_name: &str, public_id: &str, version: u64) -> String {
    format!(
        "https://res.cloudinary.com/{cloud_name}/image/upload/c_fill,h_{AVATAR_SIZE},w_{AVATAR_SIZE}/v{version}/{public_id}"
    )
}

#[async_trait]
impl AvatarStorage for CloudinaryStorage {
    async fn upload(
        &self,
        public_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String> {
        if self.config.cloud_name.is_empty() || self.config.api_key.is_empty() {
            anyhow::bail!("Cloudinary is not configured");
        }

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = [
            ("overwrite", "true".to_string()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ];
        let signature = sign(&params, &self.config.api_secret, self.config.signature_algorithm);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = format!("{API_BASE}/v1_1/{}/image/upload", self.config.cloud_name);
        let response: UploadResponse = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Cloudinary request failed")?
            .error_for_status()
            .context("Cloudinary rejected the upload")?
            .json()
            .await
            .context("unexpected Cloudinary response")?;

        tracing::info!(public_id, version = response.version, "avatar uploaded");
        Ok(delivery_url(&self.config.cloud_name, public_id, response.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_signature_matches_cloudinary_reference() {
        let params = [
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample_image".to_string()),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ];
        assert_eq!(
            sign(&params, "abcd", SignatureAlgorithm::Sha1),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn signature_is_independent_of_param_order() {
        let a = [("timestamp", "1".to_string()), ("public_id", "RestApp/u".to_string())];
        let b = [("public_id", "RestApp/u".to_string()), ("timestamp", "1".to_string())];
        for algorithm in [SignatureAlgorithm::Sha1, SignatureAlgorithm::Sha256] {
            assert_eq!(sign(&a, "secret", algorithm), sign(&b, "secret", algorithm));
            assert_ne!(sign(&a, "secret", algorithm), sign(&a, "other", algorithm));
        }
        assert_eq!(sign(&a, "secret", SignatureAlgorithm::Sha1).len(), 40);
        assert_eq!(sign(&a, "secret", SignatureAlgorithm::Sha256).len(), 64);
    }

    #[test]
    fn delivery_url_has_square_crop() {
        assert_eq!(
            delivery_url("demo", "RestApp/deadpool", 17),
            "https://res.cloudinary.com/demo/image/upload/c_fill,h_250,w_250/v17/RestApp/deadpool"
        );
    }

    #[tokio::test]
    async fn unconfigured_storage_refuses_upload() {
        let storage = CloudinaryStorage::new(CloudinaryConfig::default());
        assert!(storage.upload("RestApp/x", "a.png", vec![1, 2, 3]).await.is_err());
    }
}
