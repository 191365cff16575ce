// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Social Services
//!
//! Domain operations behind the HTTP handlers. Each mutation that touches
//! more than one document (a follow edge pair plus its notification, a like
//! on both the post and the user) runs inside a single database write
//! transaction.
//!
//! - `graph`: follow/unfollow and suggested users
//! - `engagement`: create, like, comment on and delete posts
//! - `feed`: post listings with authors resolved
//! - `profile`: profile lookup and update
//! - `notifications`: per-recipient notification inbox

pub mod engagement;
pub mod feed;
pub mod graph;
pub mod notifications;
pub mod profile;

pub use engagement::LikeOutcome;
pub use graph::FollowOutcome;

pub(crate) const USER_NOT_FOUND: &str = "User not found!";
pub(crate) const POST_NOT_FOUND: &str = "Post not found!";

/// `None` for absent or empty strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
