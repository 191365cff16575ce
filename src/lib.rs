// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chirp - Social Network API Server
//!
//! REST backend for a small social network: cookie-session accounts, posts
//! with likes and comments, a follow graph and follow/like notifications.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, session tokens and the access guard
//! - `social` - Follow, post, feed, profile and notification operations
//! - `media` - External image host (Cloudinary)
//! - `storage` - Embedded document database (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod social;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
