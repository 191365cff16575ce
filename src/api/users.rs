// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use super::body::JsonBody;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{MessageResponse, ProfileListResponse, ProfileResponse, UpdateProfileRequest},
    social::{graph, profile},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    tag = "Users",
    responses(
        (status = 200, description = "Public profile", body = ProfileResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = profile::get_profile(&state, &username)?;
    Ok(Json(ProfileResponse::new(None, profile)))
}

#[utoipa::path(
    get,
    path = "/api/users/suggested",
    tag = "Users",
    responses(
        (status = 200, description = "Up to four users the caller does not follow", body = ProfileListResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn suggested_users(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    let users = graph::suggested_users(&state, &user.user_id)?;
    Ok(Json(ProfileListResponse::new(users)))
}

#[utoipa::path(
    post,
    path = "/api/users/follow/{id}",
    params(("id" = String, Path, description = "User to follow or unfollow")),
    tag = "Users",
    responses(
        (status = 200, description = "Follow toggled", body = MessageResponse),
        (status = 400, description = "Self-follow or unknown user")
    )
)]
pub async fn follow_user(
    Auth(user): Auth,
    Path(target_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = graph::toggle_follow(&state, &user.user_id, &target_id)?;
    Ok(Json(MessageResponse::new(outcome.message())))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid input or username/email taken")
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = profile::update_profile(&state, &user.user_id, request).await?;
    Ok(Json(ProfileResponse::new(
        Some("User profile updated successfully!"),
        profile,
    )))
}
