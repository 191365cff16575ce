// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document database.
//!
//! Each repository provides CRUD operations for a specific entity type.
//! The `*_in` associated functions work inside a caller-owned write
//! transaction so that services can combine several documents atomically.

pub mod notifications;
pub mod posts;
pub mod users;

pub use notifications::{NotificationKind, NotificationRepository, StoredNotification};
pub use posts::{PostRepository, StoredComment, StoredPost};
pub use users::{ProfilePatch, StoredUser, UserRepository};
