// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users, posts and notifications in a single
//! embedded [redb](https://docs.rs/redb) database file.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   chirp.redb
//!     users, username_index, email_index
//!     posts, post_feed
//!     notifications, notification_index
//! ```
//!
//! Relations between entities are stored as ids only. Readers resolve them
//! with explicit lookups (see `social::feed`).

pub mod database;
pub mod repository;

pub use database::{Database, StoreError, StoreResult};
pub use repository::{
    NotificationKind, NotificationRepository, PostRepository, ProfilePatch, StoredComment,
    StoredNotification, StoredPost, StoredUser, UserRepository,
};
