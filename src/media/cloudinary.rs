// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cloudinary upload API client.
//!
//! Requests are signed: the parameters (minus `file` and `api_key`) are sorted,
//! joined as `k=v&k=v`, suffixed with the API secret and hashed with SHA-256.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{MediaError, MediaStore};
use crate::config::CloudinaryConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Per-request timeout for calls to the media host.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Media store backed by Cloudinary.
pub struct CloudinaryMedia {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryMedia {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{API_BASE}/{}/image/{action}", self.config.cloud_name)
    }

    /// Build the signed JSON body for an API call.
    fn signed_body(&self, params: &[(&str, &str)], file: Option<&str>) -> serde_json::Value {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let mut signed: Vec<(&str, &str)> = params.to_vec();
        signed.push(("timestamp", &timestamp));

        let mut body = serde_json::Map::new();
        for (key, value) in &signed {
            body.insert((*key).to_string(), (*value).into());
        }
        body.insert(
            "signature".into(),
            sign(&signed, &self.config.api_secret).into(),
        );
        body.insert("signature_algorithm".into(), "sha256".into());
        body.insert("api_key".into(), self.config.api_key.clone().into());
        if let Some(file) = file {
            body.insert("file".into(), file.into());
        }
        serde_json::Value::Object(body)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<T, MediaError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(MediaError::Rejected(message));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MediaStore for CloudinaryMedia {
    async fn upload(&self, data: &str) -> Result<String, MediaError> {
        let body = self.signed_body(&[], Some(data));
        let uploaded: UploadResponse = self.post("upload", body).await?;
        tracing::info!(url = %uploaded.secure_url, "Image uploaded");
        Ok(uploaded.secure_url)
    }

    async fn destroy(&self, key: &str) -> Result<(), MediaError> {
        let body = self.signed_body(&[("public_id", key)], None);
        let destroyed: DestroyResponse = self.post("destroy", body).await?;
        match destroyed.result.as_str() {
            "ok" => {
                tracing::info!(key, "Image deleted");
                Ok(())
            }
            other => Err(MediaError::Rejected(format!("destroy {key}: {other}"))),
        }
    }
}

/// SHA-256 request signature, lowercase hex.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
