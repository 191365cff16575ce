// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::Duration;
use tempfile::TempDir;

use crate::auth::TokenService;
use crate::media::testing::RecordingMedia;
use crate::state::AppState;
use crate::storage::{Database, StoredUser, UserRepository};

pub const TEST_SECRET: &str = "test-secret";

/// Fresh state over a temporary database, with a recording media store.
pub fn test_state() -> (AppState, TempDir) {
    test_state_with_media(Arc::new(RecordingMedia::default()))
}

pub fn test_state_with_media(media: Arc<RecordingMedia>) -> (AppState, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(&dir.path().join("chirp.redb")).expect("Failed to open database");
    let state = AppState::new(db, TokenService::new(TEST_SECRET, Duration::days(15)))
        .with_media(media)
        .with_secure_cookies(false);
    (state, dir)
}

/// Insert a user directly, bypassing signup (and bcrypt).
pub fn seed_user(state: &AppState, username: &str) -> StoredUser {
    let user = StoredUser::new(
        format!("{username} tester"),
        username,
        format!("{username}@example.com"),
        "$2b$10$notarealhashnotarealhashnotarealhashnotarealhashnota",
    );
    UserRepository::new(&state.db)
        .create(&user)
        .expect("Failed to seed user");
    user
}
