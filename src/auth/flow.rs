// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup, login and current-identity operations.
//!
//! Logout needs no server-side work: the handler clears the cookie.

use std::sync::OnceLock;

use regex::Regex;

use super::password::{self, is_long_enough};
use crate::error::ServiceError;
use crate::models::{LoginRequest, SignupRequest, UserProfile};
use crate::state::AppState;
use crate::storage::{StoredUser, UserRepository};

pub(crate) const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long!";
pub(crate) const INVALID_EMAIL: &str = "Invalid email format!";

/// A user together with the session token just issued for them.
#[derive(Debug)]
pub struct AuthSession {
    pub profile: UserProfile,
    pub token: String,
}

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Regex should compile"))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Register a new user and open a session for them.
pub async fn signup(state: &AppState, req: SignupRequest) -> Result<AuthSession, ServiceError> {
    let SignupRequest {
        fullname,
        username,
        email,
        password,
    } = req;

    if fullname.is_empty() || username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ServiceError::validation("Fields are mandatory!"));
    }
    if !is_valid_email(&email) {
        return Err(ServiceError::validation(INVALID_EMAIL));
    }
    if !is_long_enough(&password) {
        return Err(ServiceError::validation(PASSWORD_TOO_SHORT));
    }

    let password_hash = password::hash_password(&password).await?;
    let user = StoredUser::new(fullname, username, email, password_hash);
    UserRepository::new(&state.db).create(&user)?;

    let token = state.tokens.issue(&user.id)?;
    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    Ok(AuthSession {
        profile: UserProfile::from(&user),
        token,
    })
}

/// Check credentials and open a session.
///
/// Unknown usernames and wrong passwords fail identically, and both run one
/// bcrypt comparison.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthSession, ServiceError> {
    let user = UserRepository::new(&state.db).find_by_username(&req.username)?;

    let Some(user) = user else {
        password::verify_against_dummy(&req.password).await?;
        tracing::debug!(username = %req.username, "Login for unknown user");
        return Err(ServiceError::InvalidCredentials);
    };

    if !password::verify_password(&req.password, &user.password_hash).await? {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(ServiceError::InvalidCredentials);
    }

    let token = state.tokens.issue(&user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(AuthSession {
        profile: UserProfile::from(&user),
        token,
    })
}

/// Sanitized record of the authenticated user.
pub fn current_identity(state: &AppState, user_id: &str) -> Result<UserProfile, ServiceError> {
    UserRepository::new(&state.db)
        .get(user_id)?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(|| ServiceError::not_found("User not found!"))
}
