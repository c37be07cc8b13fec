//! Cloudinary client for the image upload and destroy endpoints.
//!
//! Both calls are form-encoded POSTs signed with SHA-256 over the sorted
//! request parameters followed by the API secret. The account must have
//! SHA-256 signatures enabled.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use stockroom_core::media::{MediaError, MediaStore, UploadedMedia};

use crate::config::CloudinaryConfig;

/// HTTP client for one Cloudinary account.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.config.base_url, self.config.cloud_name
        )
    }

    /// Add `timestamp`, `api_key` and `signature` to `params` and POST them.
    async fn signed_post<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, MediaError> {
        params.push(("timestamp", chrono::Utc::now().timestamp().to_string()));
        let signature = sign(&params, &self.config.api_secret);
        params.push(("api_key", self.config.api_key.clone()));
        params.push(("signature", signature));

        let response = self
            .client
            .post(self.endpoint(action))
            .form(&params)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MediaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let params = vec![
            ("file", format!("data:{content_type};base64,{encoded}")),
            ("folder", folder.to_string()),
        ];

        let uploaded: UploadResponse = self.signed_post("upload", params).await?;
        let key = uploaded
            .public_id
            .rsplit('/')
            .next()
            .unwrap_or(&uploaded.public_id)
            .to_string();

        tracing::debug!(key = %key, url = %uploaded.secure_url, "Image uploaded");
        Ok(UploadedMedia {
            url: uploaded.secure_url,
            key,
        })
    }

    async fn destroy(&self, key: &str, folder: &str) -> Result<(), MediaError> {
        let public_id = if folder.is_empty() {
            key.to_string()
        } else {
            format!("{folder}/{key}")
        };

        let destroyed: DestroyResponse = self
            .signed_post("destroy", vec![("public_id", public_id.clone())])
            .await?;

        match destroyed.result.as_str() {
            "ok" => {
                tracing::debug!(public_id = %public_id, "Image destroyed");
                Ok(())
            }
            "not found" => Err(MediaError::NotFound(public_id)),
            other => Err(MediaError::InvalidResponse(format!(
                "unexpected destroy result '{other}'"
            ))),
        }
    }
}

/// Compute the request signature: parameters sorted by name, joined as
/// `k=v&k=v`, with the secret appended, hashed with SHA-256 (hex).
///
/// `file`, `api_key` and `signature` are never part of the signed string.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, String)> = params
        .iter()
        .filter(|(name, _)| !matches!(*name, "file" | "api_key" | "signature"))
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let joined = signed
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{joined}{api_secret}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
