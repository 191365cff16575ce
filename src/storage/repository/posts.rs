// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post repository.
//!
//! Posts are JSON documents keyed by id. The `post_feed` index keeps every
//! post ordered newest first, so listing never needs an in-memory sort.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use redb::{ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::database::{
    feed_key, read_doc, write_doc, Database, StoreError, StoreResult, POSTS, POST_FEED, USERS,
};
use super::users::StoredUser;

/// A comment on a post. Comments keep their append order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredComment {
    pub id: String,
    /// Commenting user id
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl StoredComment {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Post record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPost {
    pub id: String,
    /// Owning user id
    pub owner_id: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Hosted image URL
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub comments: Vec<StoredComment>,
    /// Ids of users who liked the post
    #[serde(default)]
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredPost {
    pub fn new(owner_id: impl Into<String>, text: Option<String>, img: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            text,
            img,
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }
}

/// Repository for post operations on the document database.
pub struct PostRepository<'a> {
    db: &'a Database,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a post by id.
    pub fn get(&self, post_id: &str) -> StoreResult<Option<StoredPost>> {
        self.db.read(|txn| read_doc(&txn.open_table(POSTS)?, post_id))
    }

    /// Insert a new post and index it in the feed.
    pub fn create(&self, post: &StoredPost) -> StoreResult<()> {
        self.db.write(|txn| {
            write_doc(&mut txn.open_table(POSTS)?, &post.id, post)?;
            let key = feed_key(post.created_at, &post.id);
            txn.open_table(POST_FEED)?
                .insert(key.as_slice(), post.id.as_str())?;
            Ok(())
        })
    }

    /// All posts, newest first, optionally filtered.
    pub fn list_newest(
        &self,
        mut keep: impl FnMut(&StoredPost) -> bool,
    ) -> StoreResult<Vec<StoredPost>> {
        self.db.read(|txn| {
            let feed = txn.open_table(POST_FEED)?;
            let posts = txn.open_table(POSTS)?;

            let mut results = Vec::new();
            for entry in feed.iter()? {
                let (_, post_id) = entry?;
                if let Some(post) = read_doc::<StoredPost, _>(&posts, post_id.value())? {
                    if keep(&post) {
                        results.push(post);
                    }
                }
            }
            Ok(results)
        })
    }

    /// Posts authored by any of the given users, newest first.
    pub fn list_by_owners(&self, owner_ids: &[String]) -> StoreResult<Vec<StoredPost>> {
        let owners: HashSet<&str> = owner_ids.iter().map(String::as_str).collect();
        self.list_newest(|post| owners.contains(post.owner_id.as_str()))
    }

    /// Posts with the given ids, newest first. Unknown ids are skipped.
    pub fn list_by_ids(&self, post_ids: &[String]) -> StoreResult<Vec<StoredPost>> {
        let ids: HashSet<&str> = post_ids.iter().map(String::as_str).collect();
        self.list_newest(|post| ids.contains(post.id.as_str()))
    }

    /// Append a comment and return the updated post, or `None` if missing.
    pub fn add_comment(
        &self,
        post_id: &str,
        comment: StoredComment,
    ) -> StoreResult<Option<StoredPost>> {
        self.db.write(|txn| {
            let Some(mut post) = Self::load_in(txn, post_id)? else {
                return Ok(None);
            };
            post.comments.push(comment);
            post.updated_at = Utc::now();
            Self::save_in(txn, &post)?;
            Ok(Some(post))
        })
    }

    /// Delete a post, its feed entry and every liker's reference to it.
    pub fn delete(&self, post_id: &str) -> StoreResult<StoredPost> {
        self.db.write(|txn| {
            let post = txn
                .open_table(POSTS)?
                .remove(post_id)?
                .map(|value| serde_json::from_slice::<StoredPost>(value.value()))
                .transpose()?
                .ok_or_else(|| StoreError::NotFound(format!("Post {post_id}")))?;

            txn.open_table(POST_FEED)?
                .remove(feed_key(post.created_at, &post.id).as_slice())?;

            let mut users = txn.open_table(USERS)?;
            for liker_id in &post.likes {
                if let Some(mut liker) = read_doc::<StoredUser, _>(&users, liker_id)? {
                    liker.liked_posts.retain(|id| id != post_id);
                    write_doc(&mut users, liker_id, &liker)?;
                }
            }

            Ok(post)
        })
    }

    // ========== Transaction-scoped access ==========

    /// Load a post inside an open write transaction.
    pub fn load_in(txn: &WriteTransaction, post_id: &str) -> StoreResult<Option<StoredPost>> {
        read_doc(&txn.open_table(POSTS)?, post_id)
    }

    /// Persist an existing post inside an open write transaction.
    pub fn save_in(txn: &WriteTransaction, post: &StoredPost) -> StoreResult<()> {
        write_doc(&mut txn.open_table(POSTS)?, &post.id, post)
    }
}
