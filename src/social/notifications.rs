// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notification inbox.

use crate::error::ServiceError;
use crate::models::{NotificationSender, NotificationView};
use crate::state::AppState;
use crate::storage::{NotificationRepository, UserRepository};

/// Notifications addressed to `user_id`, newest first, with senders resolved.
///
/// Exactly the returned notifications are marked read. The returned views
/// show whether each one was read before this call.
pub fn list_for_recipient(
    state: &AppState,
    user_id: &str,
) -> Result<Vec<NotificationView>, ServiceError> {
    let notifications = NotificationRepository::new(&state.db).take_for_recipient(user_id)?;
    let senders = UserRepository::new(&state.db)
        .get_many(notifications.iter().map(|n| n.from.as_str()))?;

    Ok(notifications
        .into_iter()
        .map(|notification| {
            let from = senders.get(&notification.from).map(NotificationSender::from);
            NotificationView::new(notification, from)
        })
        .collect())
}

/// Delete every notification addressed to `user_id`.
pub fn clear_for_recipient(state: &AppState, user_id: &str) -> Result<usize, ServiceError> {
    let deleted = NotificationRepository::new(&state.db).delete_for_recipient(user_id)?;
    tracing::info!(user_id, deleted, "Notifications cleared");
    Ok(deleted)
}
