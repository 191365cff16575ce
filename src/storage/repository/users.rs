// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository (credential store).
//!
//! Users are stored as JSON documents keyed by id, with unique secondary
//! indexes for username and email. Uniqueness is checked and the indexes are
//! written inside the same write transaction as the document, so two
//! concurrent signups with the same username cannot both succeed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redb::{ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::database::{
    read_doc, write_doc, Database, StoreError, StoreResult, EMAIL_INDEX, USERNAME_INDEX, USERS,
};

/// User record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Unique handle
    pub username: String,
    /// Unique email address
    pub email: String,
    pub fullname: String,
    /// bcrypt hash; never leaves the storage/auth layers
    pub password_hash: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub profile_img: String,
    #[serde(default)]
    pub cover_img: String,
    /// Ids of users following this user
    #[serde(default)]
    pub followers: Vec<String>,
    /// Ids of users this user follows
    #[serde(default)]
    pub following: Vec<String>,
    /// Ids of posts this user liked
    #[serde(default)]
    pub liked_posts: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredUser {
    /// Build a fresh user with empty profile fields and edge sets.
    pub fn new(
        fullname: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            fullname: fullname.into(),
            password_hash: password_hash.into(),
            bio: String::new(),
            link: String::new(),
            profile_img: String::new(),
            cover_img: String::new(),
            followers: Vec::new(),
            following: Vec::new(),
            liked_posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.iter().any(|id| id == user_id)
    }

    pub fn has_liked(&self, post_id: &str) -> bool {
        self.liked_posts.iter().any(|id| id == post_id)
    }
}

/// Field changes applied by a profile update. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub profile_img: Option<String>,
    pub cover_img: Option<String>,
    pub password_hash: Option<String>,
}

/// Repository for user operations on the document database.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a user by id.
    pub fn get(&self, user_id: &str) -> StoreResult<Option<StoredUser>> {
        self.db.read(|txn| read_doc(&txn.open_table(USERS)?, user_id))
    }

    /// Look up a user by username.
    pub fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredUser>> {
        self.db.read(|txn| {
            let index = txn.open_table(USERNAME_INDEX)?;
            let user_id = match index.get(username)? {
                Some(id) => id.value().to_string(),
                None => return Ok(None),
            };
            read_doc(&txn.open_table(USERS)?, &user_id)
        })
    }

    /// Load several users in one snapshot, keyed by id. Unknown ids are skipped.
    pub fn get_many<'i>(
        &self,
        user_ids: impl IntoIterator<Item = &'i str>,
    ) -> StoreResult<HashMap<String, StoredUser>> {
        self.db.read(|txn| {
            let table = txn.open_table(USERS)?;
            let mut users = HashMap::new();
            for id in user_ids {
                if users.contains_key(id) {
                    continue;
                }
                if let Some(user) = read_doc::<StoredUser, _>(&table, id)? {
                    users.insert(user.id.clone(), user);
                }
            }
            Ok(users)
        })
    }

    /// List every user.
    pub fn list_all(&self) -> StoreResult<Vec<StoredUser>> {
        self.db.read(|txn| {
            let table = txn.open_table(USERS)?;
            let mut users = Vec::new();
            for entry in table.iter()? {
                let (_, value) = entry?;
                users.push(serde_json::from_slice(value.value())?);
            }
            Ok(users)
        })
    }

    /// Insert a new user, enforcing username and email uniqueness.
    pub fn create(&self, user: &StoredUser) -> StoreResult<()> {
        self.db.write(|txn| {
            let mut usernames = txn.open_table(USERNAME_INDEX)?;
            if usernames.get(user.username.as_str())?.is_some() {
                return Err(StoreError::UsernameTaken(user.username.clone()));
            }
            let mut emails = txn.open_table(EMAIL_INDEX)?;
            if emails.get(user.email.as_str())?.is_some() {
                return Err(StoreError::EmailTaken(user.email.clone()));
            }

            usernames.insert(user.username.as_str(), user.id.as_str())?;
            emails.insert(user.email.as_str(), user.id.as_str())?;
            write_doc(&mut txn.open_table(USERS)?, &user.id, user)
        })
    }

    /// Apply a profile patch to the latest stored version of a user.
    ///
    /// Username and email changes move the corresponding index entries and
    /// fail with `UsernameTaken` / `EmailTaken` if another user holds the
    /// new value.
    pub fn apply_patch(&self, user_id: &str, patch: ProfilePatch) -> StoreResult<StoredUser> {
        self.db.write(|txn| {
            let mut user = Self::load_in(txn, user_id)?
                .ok_or_else(|| StoreError::NotFound(format!("User {user_id}")))?;

            if let Some(username) = patch.username.filter(|u| *u != user.username) {
                let mut index = txn.open_table(USERNAME_INDEX)?;
                if index.get(username.as_str())?.is_some() {
                    return Err(StoreError::UsernameTaken(username));
                }
                index.remove(user.username.as_str())?;
                index.insert(username.as_str(), user_id)?;
                user.username = username;
            }

            if let Some(email) = patch.email.filter(|e| *e != user.email) {
                let mut index = txn.open_table(EMAIL_INDEX)?;
                if index.get(email.as_str())?.is_some() {
                    return Err(StoreError::EmailTaken(email));
                }
                index.remove(user.email.as_str())?;
                index.insert(email.as_str(), user_id)?;
                user.email = email;
            }

            if let Some(fullname) = patch.fullname {
                user.fullname = fullname;
            }
            if let Some(bio) = patch.bio {
                user.bio = bio;
            }
            if let Some(link) = patch.link {
                user.link = link;
            }
            if let Some(profile_img) = patch.profile_img {
                user.profile_img = profile_img;
            }
            if let Some(cover_img) = patch.cover_img {
                user.cover_img = cover_img;
            }
            if let Some(password_hash) = patch.password_hash {
                user.password_hash = password_hash;
            }
            user.updated_at = Utc::now();

            Self::save_in(txn, &user)?;
            Ok(user)
        })
    }

    // ========== Transaction-scoped access ==========

    /// Load a user inside an open write transaction.
    pub fn load_in(txn: &WriteTransaction, user_id: &str) -> StoreResult<Option<StoredUser>> {
        read_doc(&txn.open_table(USERS)?, user_id)
    }

    /// Persist a user document inside an open write transaction.
    ///
    /// Only for documents whose username/email are unchanged; index moves go
    /// through [`UserRepository::apply_patch`].
    pub fn save_in(txn: &WriteTransaction, user: &StoredUser) -> StoreResult<()> {
        write_doc(&mut txn.open_table(USERS)?, &user.id, user)
    }
}
