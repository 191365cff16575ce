// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::media::{DisabledMedia, MediaStore};
use crate::storage::Database;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenService>,
    pub media: Arc<dyn MediaStore>,
    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl AppState {
    /// State with media uploads disabled and secure cookies.
    pub fn new(db: Database, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            media: Arc::new(DisabledMedia),
            secure_cookies: true,
        }
    }

    pub fn with_media(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = media;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}
