// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is CurrentUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use super::{cookie::session_token, AuthError, CurrentUser};
use crate::models::UserProfile;
use crate::state::AppState;
use crate::storage::UserRepository;

/// Extractor for authenticated users.
///
/// Uses the identity attached by [`super::middleware::require_auth`] when the
/// route is guarded, and otherwise checks the session cookie itself.
pub struct Auth(pub CurrentUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authenticate(state, &parts.headers)?;
        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

/// Resolve the session cookie in `headers` to a user.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
    let token = session_token(headers).ok_or(AuthError::Unauthenticated)?;
    let claims = state
        .tokens
        .verify(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    let user = UserRepository::new(&state.db)
        .get(&claims.sub)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::UserNotFound)?;

    Ok(CurrentUser {
        user_id: user.id.clone(),
        profile: UserProfile::from(&user),
    })
}
