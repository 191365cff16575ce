// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie construction and parsing.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use chrono::Duration;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> HeaderValue {
    build(token, max_age.num_seconds(), secure)
}

/// `Set-Cookie` value that clears the session cookie.
pub fn cleared_session_cookie(secure: bool) -> HeaderValue {
    build("", 0, secure)
}

fn build(value: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Strict");
    if secure {
        cookie.push_str("; Secure");
    }
    // Tokens are base64url and the attributes are ASCII
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("token=; Max-Age=0"))
}

/// The non-empty session token from the request's `Cookie` headers, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
