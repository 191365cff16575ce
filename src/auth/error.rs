// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access guard errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::INTERNAL_ERROR_MESSAGE;

/// Reasons the access guard rejects a request.
#[derive(Debug)]
pub enum AuthError {
    /// No session cookie, or an empty one
    Unauthenticated,
    /// Cookie present but the token failed verification
    InvalidToken,
    /// Token is valid but its user no longer exists
    UserNotFound,
    /// Storage failure while resolving the user
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    status: bool,
    error: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Unauthenticated user!"),
            AuthError::InvalidToken => write!(f, "Unauthorised: Invalid Token!"),
            AuthError::UserNotFound => write!(f, "User not found!"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "Access guard failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            status: false,
            error,
        });
        (status, body).into_response()
    }
}
