// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    Json,
};

use super::body::JsonBody;
use crate::{
    auth::{
        cookie::{cleared_session_cookie, session_cookie},
        flow::{self, AuthSession},
        Auth,
    },
    error::ApiError,
    models::{LoginRequest, MessageResponse, ProfileResponse, SignupRequest},
    state::AppState,
};

type SetCookie = [(axum::http::HeaderName, HeaderValue); 1];

fn set_session(state: &AppState, session: &AuthSession) -> SetCookie {
    [(
        SET_COOKIE,
        session_cookie(&session.token, state.tokens.ttl(), state.secure_cookies),
    )]
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created; session cookie set", body = ProfileResponse),
        (status = 400, description = "Invalid input or username/email taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<(StatusCode, SetCookie, Json<ProfileResponse>), ApiError> {
    let session = flow::signup(&state, request).await?;
    let cookie = set_session(&state, &session);
    Ok((
        StatusCode::CREATED,
        cookie,
        Json(ProfileResponse::new(
            Some("Signed up successfully!"),
            session.profile,
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Logged in; session cookie set", body = ProfileResponse),
        (status = 400, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(SetCookie, Json<ProfileResponse>), ApiError> {
    let session = flow::login(&state, request).await?;
    let cookie = set_session(&state, &session);
    Ok((
        cookie,
        Json(ProfileResponse::new(
            Some("Logged in successfully!"),
            session.profile,
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared", body = MessageResponse))
)]
pub async fn logout(State(state): State<AppState>) -> (SetCookie, Json<MessageResponse>) {
    (
        [(SET_COOKIE, cleared_session_cookie(state.secure_cookies))],
        Json(MessageResponse::new("Logged out successfully!")),
    )
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated user", body = ProfileResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "User not found")
    )
)]
pub async fn me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = flow::current_identity(&state, &user.user_id)?;
    Ok(Json(ProfileResponse::new(None, profile)))
}
