// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `username_index`: username → user_id
//! - `email_index`: email → user_id
//! - `posts`: post_id → serialized StoredPost
//! - `post_feed`: composite key (!created_at|post_id) → post_id
//! - `notifications`: notification_id → serialized StoredNotification
//! - `notification_index`: composite key (recipient|!created_at|id) → id
//!
//! Documents are stored as JSON bytes. Every multi-document mutation runs
//! inside a single write transaction (see [`Database::write`]), so the two
//! sides of a follow edge or a like can never be persisted separately.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{
    ReadTransaction, ReadableDatabase, ReadableTable, Table, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Unique index: username → user_id.
pub(crate) const USERNAME_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("username_index");

/// Unique index: email → user_id.
pub(crate) const EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("email_index");

/// Primary table: post_id → serialized StoredPost (JSON bytes).
pub(crate) const POSTS: TableDefinition<&str, &[u8]> = TableDefinition::new("posts");

/// Index: `!created_at_be|post_id` → post_id, scanned forward for newest-first.
pub(crate) const POST_FEED: TableDefinition<&[u8], &str> = TableDefinition::new("post_feed");

/// Primary table: notification_id → serialized StoredNotification (JSON bytes).
pub(crate) const NOTIFICATIONS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("notifications");

/// Index: `recipient|!created_at_be|notification_id` → notification_id.
pub(crate) const NOTIFICATION_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("notification_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("email already taken: {0}")]
    EmailTaken(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Document Helpers
// =============================================================================

/// Read and deserialize a JSON document from any readable table.
pub(crate) fn read_doc<T, R>(table: &R, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(key)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Serialize and insert a JSON document, replacing any previous value.
pub(crate) fn write_doc<T: Serialize>(
    table: &mut Table<'_, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let json = serde_json::to_vec(value)?;
    table.insert(key, json.as_slice())?;
    Ok(())
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Inverted big-endian timestamp so that newer entries sort first.
fn inverted_timestamp(at: DateTime<Utc>) -> [u8; 8] {
    (!at.timestamp_micros() as u64).to_be_bytes()
}

/// Build a key for the global post feed: `!created_at | post_id`.
pub(crate) fn feed_key(created_at: DateTime<Utc>, post_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 1 + post_id.len());
    key.extend_from_slice(&inverted_timestamp(created_at));
    key.push(b'|');
    key.extend_from_slice(post_id.as_bytes());
    key
}

/// Build a composite key scoped to an owner: `owner | !created_at | id`.
pub(crate) fn scoped_key(owner: &str, created_at: DateTime<Utc>, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner.len() + 1 + 8 + 1 + id.len());
    key.extend_from_slice(owner.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&inverted_timestamp(created_at));
    key.push(b'|');
    key.extend_from_slice(id.as_bytes());
    key
}

/// Range bounds covering every `scoped_key` of one owner.
pub(crate) fn scope_range(owner: &str) -> (Vec<u8>, Vec<u8>) {
    let mut start = Vec::with_capacity(owner.len() + 1);
    start.extend_from_slice(owner.as_bytes());
    start.push(b'|');

    let mut end = start.clone();
    // Past any timestamp bytes; the separator after them is always below 0xFF
    end.extend_from_slice(&[0xFF; 9]);
    (start, end)
}

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID document database.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAME_INDEX)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(POSTS)?;
            let _ = write_txn.open_table(POST_FEED)?;
            let _ = write_txn.open_table(NOTIFICATIONS)?;
            let _ = write_txn.open_table(NOTIFICATION_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Run `f` inside one write transaction and commit if it succeeds.
    ///
    /// Returning an error from `f` drops the transaction uncommitted, which
    /// aborts every write made inside it.
    pub fn write<T, E>(&self, f: impl FnOnce(&WriteTransaction) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let txn = self.db.begin_write().map_err(StoreError::from)?;
        let value = f(&txn)?;
        txn.commit().map_err(StoreError::from)?;
        Ok(value)
    }

    /// Run `f` against a consistent read snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&ReadTransaction) -> StoreResult<T>) -> StoreResult<T> {
        let txn = self.db.begin_read()?;
        f(&txn)
    }

    /// Check that the database can serve reads.
    pub fn health_check(&self) -> StoreResult<()> {
        self.read(|txn| {
            let _ = txn.open_table(USERS)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("chirp.redb");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        db.health_check().unwrap();
    }

    #[test]
    fn failed_write_closure_rolls_back() {
        let (db, _dir) = temp_db();

        let result: StoreResult<()> = db.write(|txn| {
            let mut table = txn.open_table(USERS)?;
            write_doc(&mut table, "u1", &serde_json::json!({"name": "ghost"}))?;
            Err(StoreError::NotFound("forced".into()))
        });
        assert!(result.is_err());

        let stored: Option<serde_json::Value> = db
            .read(|txn| read_doc(&txn.open_table(USERS)?, "u1"))
            .unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn committed_write_is_visible() {
        let (db, _dir) = temp_db();
        db.write(|txn| -> StoreResult<()> {
            let mut table = txn.open_table(POSTS)?;
            write_doc(&mut table, "p1", &vec![1, 2, 3])
        })
        .unwrap();

        let stored: Option<Vec<i32>> = db
            .read(|txn| read_doc(&txn.open_table(POSTS)?, "p1"))
            .unwrap();
        assert_eq!(stored, Some(vec![1, 2, 3]));
    }

    #[test]
    fn feed_key_orders_newest_first() {
        let now = Utc::now();
        let old = feed_key(now - Duration::seconds(10), "a");
        let new = feed_key(now, "b");
        assert!(new < old, "Newer timestamps should sort first");
    }

    #[test]
    fn scoped_keys_stay_inside_their_range() {
        let now = Utc::now();
        let (start, end) = scope_range("user-1");
        let key = scoped_key("user-1", now, "n-1");
        assert!(key >= start && key < end);

        let other = scoped_key("user-10", now, "n-2");
        assert!(!(other >= start && other < end));
    }
}
