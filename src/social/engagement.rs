// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post creation, likes, comments and deletion.

use super::{feed, non_empty, POST_NOT_FOUND, USER_NOT_FOUND};
use crate::error::ServiceError;
use crate::media::media_key_from_url;
use crate::models::{CreatePostRequest, PostView};
use crate::state::AppState;
use crate::storage::{
    NotificationKind, NotificationRepository, PostRepository, StoreError, StoredComment,
    StoredNotification, StoredPost, UserRepository,
};

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

impl LikeOutcome {
    pub fn message(self) -> &'static str {
        match self {
            LikeOutcome::Liked => "Post liked successfully!",
            LikeOutcome::Unliked => "Post unliked successfully!",
        }
    }
}

/// Create a post with text, an image, or both.
///
/// The image payload is uploaded to the media host and the post stores the
/// returned URL.
pub async fn create_post(
    state: &AppState,
    actor_id: &str,
    req: CreatePostRequest,
) -> Result<PostView, ServiceError> {
    UserRepository::new(&state.db)
        .get(actor_id)?
        .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

    let text = non_empty(req.text);
    let img = non_empty(req.img);
    if text.is_none() && img.is_none() {
        return Err(ServiceError::validation("Post must have text or image!"));
    }

    let img = match img {
        Some(payload) => Some(state.media.upload(&payload).await?),
        None => None,
    };

    let post = StoredPost::new(actor_id, text, img);
    PostRepository::new(&state.db).create(&post)?;
    tracing::info!(post_id = %post.id, user_id = actor_id, "Post created");

    feed::post_view(state, post)
}

/// Like the post if the actor has not liked it yet, otherwise unlike it.
///
/// Returns the outcome and the post's liker ids after the change. The post,
/// the actor's liked set and the `like` notification share one transaction.
pub fn toggle_like(
    state: &AppState,
    actor_id: &str,
    post_id: &str,
) -> Result<(LikeOutcome, Vec<String>), ServiceError> {
    let (outcome, likes) = state.db.write(|txn| -> Result<_, ServiceError> {
        let mut post = PostRepository::load_in(txn, post_id)?
            .ok_or_else(|| ServiceError::not_found(POST_NOT_FOUND))?;
        let mut actor = UserRepository::load_in(txn, actor_id)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

        let outcome = if post.is_liked_by(actor_id) {
            post.likes.retain(|id| id != actor_id);
            actor.liked_posts.retain(|id| id != post_id);
            LikeOutcome::Unliked
        } else {
            post.likes.push(actor_id.to_string());
            if !actor.has_liked(post_id) {
                actor.liked_posts.push(post_id.to_string());
            }
            NotificationRepository::append_in(
                txn,
                &StoredNotification::new(actor_id, post.owner_id.as_str(), NotificationKind::Like),
            )?;
            LikeOutcome::Liked
        };

        PostRepository::save_in(txn, &post)?;
        UserRepository::save_in(txn, &actor)?;
        Ok((outcome, post.likes))
    })?;

    tracing::info!(post_id, user_id = actor_id, ?outcome, "Like toggled");
    Ok((outcome, likes))
}

/// Append a comment and return the post with authors resolved.
pub fn comment(
    state: &AppState,
    actor_id: &str,
    post_id: &str,
    text: Option<String>,
) -> Result<PostView, ServiceError> {
    let text = non_empty(text).ok_or_else(|| ServiceError::validation("Text field is required!"))?;

    let post = PostRepository::new(&state.db)
        .add_comment(post_id, StoredComment::new(actor_id, text))?
        .ok_or_else(|| ServiceError::not_found(POST_NOT_FOUND))?;
    tracing::info!(post_id, user_id = actor_id, "Comment added");

    feed::post_view(state, post)
}

/// Delete a post owned by the actor.
///
/// The post and every liker's reference to it are removed first. An attached
/// image is then deleted from the media host; if that fails the error is
/// logged and the deletion still succeeds.
pub async fn delete_post(state: &AppState, actor_id: &str, post_id: &str) -> Result<(), ServiceError> {
    let posts = PostRepository::new(&state.db);
    let post = posts
        .get(post_id)?
        .ok_or_else(|| ServiceError::not_found(POST_NOT_FOUND))?;

    if post.owner_id != actor_id {
        tracing::warn!(post_id, user_id = actor_id, "Rejected delete of another user's post");
        return Err(ServiceError::Forbidden(
            "You are not authorized to delete this post!".into(),
        ));
    }

    let deleted = match posts.delete(post_id) {
        Ok(post) => post,
        Err(StoreError::NotFound(_)) => return Err(ServiceError::not_found(POST_NOT_FOUND)),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(post_id, user_id = actor_id, "Post deleted");

    if let Some(key) = deleted.img.as_deref().and_then(media_key_from_url) {
        if let Err(e) = state.media.destroy(&key).await {
            tracing::warn!(post_id, key = %key, error = %e, "Failed to delete post image");
        }
    }

    Ok(())
}
