// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! bcrypt password hashing. All bcrypt work runs on the blocking pool.

use std::sync::LazyLock;

/// bcrypt work factor for new hashes.
pub const BCRYPT_COST: u32 = 10;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash compared against when a login names an unknown user, so that both
/// failure paths spend the same time in bcrypt.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| bcrypt::hash("chirp-dummy-password", BCRYPT_COST).ok());

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Whether a password meets the length requirement.
pub fn is_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Hash a password with [`BCRYPT_COST`].
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST)).await??;
    Ok(hash)
}

/// Check a password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let matches = tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).unwrap_or(false)
    })
    .await?;
    Ok(matches)
}

/// Burn one bcrypt comparison for a login against a missing user.
pub async fn verify_against_dummy(password: &str) -> Result<(), PasswordError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = bcrypt::verify(password, hash);
        }
    })
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("hunter22").await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("hunter22", &hash).await.unwrap());
        assert!(!verify_password("hunter23", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let a = hash_password("secret1").await.unwrap();
        let b = hash_password("secret1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("secret1", "not-a-hash").await.unwrap());
    }

    #[tokio::test]
    async fn dummy_verification_completes() {
        verify_against_dummy("whatever").await.unwrap();
    }

    #[test]
    fn length_counts_characters() {
        assert!(!is_long_enough("abcde"));
        assert!(is_long_enough("abcdef"));
        assert!(is_long_enough("ééééé\u{e9}"));
    }
}
