// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Media Host
//!
//! Images attached to posts and profiles are stored by an external media
//! host. The rest of the crate only sees the [`MediaStore`] capability:
//! upload a payload and get back a public URL, or destroy an asset by key.
//!
//! - [`CloudinaryMedia`]: signed requests to the Cloudinary upload API
//! - [`DisabledMedia`]: used when no credentials are configured

mod cloudinary;

pub use cloudinary::CloudinaryMedia;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Image uploads are not configured!")]
    Disabled,

    #[error("media host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media host rejected the request: {0}")]
    Rejected(String),
}

/// Upload and delete capability of the media host.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload an image payload (data URI or remote URL) and return its
    /// public HTTPS URL.
    async fn upload(&self, data: &str) -> Result<String, MediaError>;

    /// Delete the asset with the given key.
    async fn destroy(&self, key: &str) -> Result<(), MediaError>;
}

/// Media store used when uploads are not configured.
///
/// Uploads fail with [`MediaError::Disabled`]; deletes succeed without doing
/// anything, so stale image URLs never block post deletion.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMedia;

#[async_trait]
impl MediaStore for DisabledMedia {
    async fn upload(&self, _data: &str) -> Result<String, MediaError> {
        Err(MediaError::Disabled)
    }

    async fn destroy(&self, key: &str) -> Result<(), MediaError> {
        tracing::debug!(key, "Media host disabled; skipping delete");
        Ok(())
    }
}

/// Derive the media host key from an asset URL: the last path segment up to
/// its first `.`.
///
/// `https://res.cloudinary.com/demo/image/upload/v1/abc123.jpg` → `abc123`
pub fn media_key_from_url(asset_url: &str) -> Option<String> {
    let last_segment = match url::Url::parse(asset_url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_owned),
        Err(_) => asset_url.rsplit('/').next().map(str::to_owned),
    }?;

    let key = last_segment.split('.').next().unwrap_or_default();
    (!key.is_empty()).then(|| key.to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// In-memory media store that records every call.
    #[derive(Debug, Default)]
    pub struct RecordingMedia {
        pub uploads: Mutex<Vec<String>>,
        pub destroyed: Mutex<Vec<String>>,
        pub fail_destroy: bool,
    }

    impl RecordingMedia {
        pub fn failing_destroy() -> Self {
            Self {
                fail_destroy: true,
                ..Self::default()
            }
        }

        pub fn destroyed_keys(&self) -> Vec<String> {
            self.destroyed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaStore for RecordingMedia {
        async fn upload(&self, data: &str) -> Result<String, MediaError> {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(data.to_string());
            Ok(format!(
                "https://media.test/image/upload/v1/img{}.png",
                uploads.len()
            ))
        }

        async fn destroy(&self, key: &str) -> Result<(), MediaError> {
            self.destroyed.lock().unwrap().push(key.to_string());
            if self.fail_destroy {
                return Err(MediaError::Rejected("simulated outage".into()));
            }
            Ok(())
        }
    }
}
