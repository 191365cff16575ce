// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Follow graph mutations and user suggestions.

use rand::seq::SliceRandom;

use super::USER_NOT_FOUND;
use crate::error::ServiceError;
use crate::models::UserProfile;
use crate::state::AppState;
use crate::storage::{
    NotificationKind, NotificationRepository, StoredNotification, UserRepository,
};

/// Candidates drawn before filtering out already-followed users.
const SUGGESTION_SAMPLE_SIZE: usize = 10;

/// Maximum number of suggested users returned.
const SUGGESTION_LIMIT: usize = 4;

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    Unfollowed,
}

impl FollowOutcome {
    pub fn message(self) -> &'static str {
        match self {
            FollowOutcome::Followed => "User followed successfully!",
            FollowOutcome::Unfollowed => "User unfollowed successfully!",
        }
    }
}

/// Follow `target_id` if `actor_id` does not follow them yet, otherwise
/// unfollow.
///
/// Both edge sets and the `follow` notification are written in one
/// transaction.
pub fn toggle_follow(
    state: &AppState,
    actor_id: &str,
    target_id: &str,
) -> Result<FollowOutcome, ServiceError> {
    if actor_id == target_id {
        return Err(ServiceError::validation("You can't follow/unfollow yourself!"));
    }

    let outcome = state.db.write(|txn| -> Result<FollowOutcome, ServiceError> {
        let target = UserRepository::load_in(txn, target_id)?;
        let actor = UserRepository::load_in(txn, actor_id)?;
        let (Some(mut target), Some(mut actor)) = (target, actor) else {
            return Err(ServiceError::validation(USER_NOT_FOUND));
        };

        let outcome = if actor.is_following(target_id) {
            actor.following.retain(|id| id != target_id);
            target.followers.retain(|id| id != actor_id);
            FollowOutcome::Unfollowed
        } else {
            actor.following.push(target_id.to_string());
            if !target.followers.iter().any(|id| id == actor_id) {
                target.followers.push(actor_id.to_string());
            }
            NotificationRepository::append_in(
                txn,
                &StoredNotification::new(actor_id, target_id, NotificationKind::Follow),
            )?;
            FollowOutcome::Followed
        };

        UserRepository::save_in(txn, &actor)?;
        UserRepository::save_in(txn, &target)?;
        Ok(outcome)
    })?;

    tracing::info!(actor_id, target_id, ?outcome, "Follow toggled");
    Ok(outcome)
}

/// Up to four random users the actor does not follow, excluding the actor.
pub fn suggested_users(state: &AppState, actor_id: &str) -> Result<Vec<UserProfile>, ServiceError> {
    let users = UserRepository::new(&state.db);
    let actor = users
        .get(actor_id)?
        .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

    let candidates: Vec<_> = users
        .list_all()?
        .into_iter()
        .filter(|user| user.id != actor.id)
        .collect();

    let mut rng = rand::thread_rng();
    let suggestions = candidates
        .choose_multiple(&mut rng, SUGGESTION_SAMPLE_SIZE)
        .filter(|user| !actor.is_following(&user.id))
        .take(SUGGESTION_LIMIT)
        .map(UserProfile::from)
        .collect();

    Ok(suggestions)
}
