// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types shared by the services and the HTTP layer.
//!
//! Services return [`ServiceError`]; handlers convert it into an
//! [`ApiError`], which renders the failure envelope
//! `{"status": false, "error": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{PasswordError, TokenError};
use crate::media::MediaError;
use crate::storage::StoreError;

/// Message returned to clients for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    status: bool,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Log the cause and hide it behind the generic message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            status: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Failure of a domain operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or incomplete input (400)
    #[error("{0}")]
    Validation(String),

    /// Unique username or email already in use (400)
    #[error("{0}")]
    Conflict(String),

    /// Wrong username or password (400)
    #[error("Invalid username or password!")]
    InvalidCredentials,

    /// Caller does not own the resource (401)
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => Self::Conflict("Username is already taken!".into()),
            StoreError::EmailTaken(_) => Self::Conflict("Email is already taken!".into()),
            other => Self::Store(other),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) | ServiceError::Conflict(msg) => Self::bad_request(msg),
            ServiceError::InvalidCredentials => Self::bad_request(err.to_string()),
            ServiceError::Forbidden(msg) => Self::unauthorized(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Media(MediaError::Disabled) => {
                Self::bad_request(MediaError::Disabled.to_string())
            }
            other => Self::internal(other),
        }
    }
}
