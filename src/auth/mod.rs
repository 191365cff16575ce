// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Password and session-cookie authentication.
//!
//! ## Auth Flow
//!
//! 1. Signup or login checks the credentials (bcrypt, cost 10)
//! 2. The server issues an HS256 session token (`sub` = user id)
//! 3. The token is returned in an HTTP-only `token` cookie
//! 4. Guarded routes verify the cookie, load the user and attach a
//!    [`CurrentUser`] to the request
//!
//! ## Security
//!
//! - Password hashes never leave the storage and auth layers
//! - Login failures do not reveal whether the username exists
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod flow;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{CurrentUser, SessionClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::PasswordError;
pub use token::{TokenError, TokenService};
