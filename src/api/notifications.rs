// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{MessageResponse, NotificationListResponse},
    social::notifications,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses(
        (status = 200, description = "Caller's notifications, newest first; all returned are marked read", body = NotificationListResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_notifications(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let items = notifications::list_for_recipient(&state, &user.user_id)?;
    Ok(Json(NotificationListResponse::new(items)))
}

#[utoipa::path(
    delete,
    path = "/api/notifications",
    tag = "Notifications",
    responses(
        (status = 200, description = "Caller's notifications deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn delete_notifications(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    notifications::clear_for_recipient(&state, &user.user_id)?;
    Ok(Json(MessageResponse::new("Notifications deleted successfully!")))
}
