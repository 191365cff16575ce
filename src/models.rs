// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request and response bodies of the HTTP API.
//!
//! Field names follow the browser client (`_id`, camelCase). Every success
//! body is an envelope `{status: true, message, data}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::storage::{NotificationKind, StoredNotification, StoredUser};

// =============================================================================
// Projections
// =============================================================================

/// A user record without its password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub link: String,
    pub profile_img: String,
    pub cover_img: String,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub liked_posts: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredUser> for UserProfile {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            fullname: user.fullname.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            link: user.link.clone(),
            profile_img: user.profile_img.clone(),
            cover_img: user.cover_img.clone(),
            followers: user.followers.clone(),
            following: user.following.clone(),
            liked_posts: user.liked_posts.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The fields of a notification sender shown to the recipient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSender {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub profile_img: String,
}

impl From<&StoredUser> for NotificationSender {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            profile_img: user.profile_img.clone(),
        }
    }
}

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: String,
    /// `null` if the author no longer exists
    pub user: Option<UserProfile>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A post with its author and comment authors resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: Option<UserProfile>,
    pub text: Option<String>,
    pub img: Option<String>,
    /// Ids of users who liked the post
    pub likes: Vec<String>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A notification with its sender resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    #[serde(rename = "_id")]
    pub id: String,
    pub from: Option<NotificationSender>,
    /// Recipient user id
    pub to: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    pub fn new(notification: StoredNotification, from: Option<NotificationSender>) -> Self {
        Self {
            id: notification.id,
            from,
            to: notification.to,
            kind: notification.kind,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Missing and `null` fields both read as empty strings.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub fullname: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePostRequest {
    pub text: Option<String>,
    /// Image payload accepted by the media host (data URI or remote URL)
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    pub text: Option<String>,
}

/// Profile changes. Absent or empty fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub profile_img: Option<String>,
    pub cover_img: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

// =============================================================================
// Response envelopes
// =============================================================================

/// Envelope carrying no data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: bool,
    pub message: Option<String>,
    /// Always `null`
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub status: bool,
    pub message: Option<String>,
    pub data: UserProfile,
}

impl ProfileResponse {
    pub fn new(message: Option<&str>, data: UserProfile) -> Self {
        Self {
            status: true,
            message: message.map(str::to_owned),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileListResponse {
    pub status: bool,
    pub message: Option<String>,
    pub data: Vec<UserProfile>,
}

impl ProfileListResponse {
    pub fn new(data: Vec<UserProfile>) -> Self {
        Self {
            status: true,
            message: None,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    pub status: bool,
    pub message: Option<String>,
    pub data: PostView,
}

impl PostResponse {
    pub fn new(message: &str, data: PostView) -> Self {
        Self {
            status: true,
            message: Some(message.to_owned()),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostListResponse {
    pub status: bool,
    pub message: Option<String>,
    pub data: Vec<PostView>,
}

impl PostListResponse {
    pub fn new(message: Option<&str>, data: Vec<PostView>) -> Self {
        Self {
            status: true,
            message: message.map(str::to_owned),
            data,
        }
    }
}

/// Result of a like toggle: the post's liker ids after the change.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikesResponse {
    pub status: bool,
    pub message: Option<String>,
    pub data: Vec<String>,
}

impl LikesResponse {
    pub fn new(message: &str, data: Vec<String>) -> Self {
        Self {
            status: true,
            message: Some(message.to_owned()),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub status: bool,
    pub message: Option<String>,
    pub data: Vec<NotificationView>,
}

impl NotificationListResponse {
    pub fn new(data: Vec<NotificationView>) -> Self {
        Self {
            status: true,
            message: None,
            data,
        }
    }
}
