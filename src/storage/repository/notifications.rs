// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notification repository.
//!
//! Notifications are appended as a side effect of follows and likes and are
//! only ever bulk-read or bulk-deleted per recipient. Each one is indexed
//! under `recipient|!created_at|id` so a recipient's notifications come back
//! newest first from a single range scan.

use chrono::{DateTime, Utc};
use redb::{ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::database::{
    read_doc, scope_range, scoped_key, write_doc, Database, StoreResult, NOTIFICATIONS,
    NOTIFICATION_INDEX,
};

/// Kind of social event a notification reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
}

/// Notification record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredNotification {
    pub id: String,
    /// Sender user id
    pub from: String,
    /// Recipient user id
    pub to: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl StoredNotification {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from: from.into(),
            to: to.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Repository for notification operations on the document database.
pub struct NotificationRepository<'a> {
    db: &'a Database,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new NotificationRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Append a notification in its own transaction.
    pub fn create(&self, notification: &StoredNotification) -> StoreResult<()> {
        self.db.write(|txn| Self::append_in(txn, notification))
    }

    /// A recipient's notifications, newest first, without touching read flags.
    pub fn list_for_recipient(&self, recipient_id: &str) -> StoreResult<Vec<StoredNotification>> {
        let (start, end) = scope_range(recipient_id);
        self.db.read(|txn| {
            let index = txn.open_table(NOTIFICATION_INDEX)?;
            let table = txn.open_table(NOTIFICATIONS)?;

            let mut results = Vec::new();
            for entry in index.range(start.as_slice()..end.as_slice())? {
                let (_, id) = entry?;
                if let Some(notification) = read_doc(&table, id.value())? {
                    results.push(notification);
                }
            }
            Ok(results)
        })
    }

    /// Return a recipient's notifications and mark exactly those as read.
    ///
    /// The scan and the update share one write transaction, so a notification
    /// appended concurrently is neither returned nor marked. The returned
    /// documents carry the read flag as it was before this call.
    pub fn take_for_recipient(&self, recipient_id: &str) -> StoreResult<Vec<StoredNotification>> {
        let (start, end) = scope_range(recipient_id);
        self.db.write(|txn| {
            let ids: Vec<String> = {
                let index = txn.open_table(NOTIFICATION_INDEX)?;
                let mut ids = Vec::new();
                for entry in index.range(start.as_slice()..end.as_slice())? {
                    let (_, id) = entry?;
                    ids.push(id.value().to_string());
                }
                ids
            };

            let mut table = txn.open_table(NOTIFICATIONS)?;
            let mut results = Vec::with_capacity(ids.len());
            for id in ids {
                let Some(notification) = read_doc::<StoredNotification, _>(&table, &id)? else {
                    continue;
                };
                if !notification.read {
                    let marked = StoredNotification {
                        read: true,
                        ..notification.clone()
                    };
                    write_doc(&mut table, &id, &marked)?;
                }
                results.push(notification);
            }
            Ok(results)
        })
    }

    /// Delete every notification addressed to a recipient. Returns the count.
    pub fn delete_for_recipient(&self, recipient_id: &str) -> StoreResult<usize> {
        let (start, end) = scope_range(recipient_id);
        self.db.write(|txn| {
            let mut index = txn.open_table(NOTIFICATION_INDEX)?;
            let mut entries = Vec::new();
            for entry in index.range(start.as_slice()..end.as_slice())? {
                let (key, id) = entry?;
                entries.push((key.value().to_vec(), id.value().to_string()));
            }

            let mut table = txn.open_table(NOTIFICATIONS)?;
            for (key, id) in &entries {
                index.remove(key.as_slice())?;
                table.remove(id.as_str())?;
            }
            Ok(entries.len())
        })
    }

    // ========== Transaction-scoped access ==========

    /// Append a notification inside an open write transaction.
    pub fn append_in(txn: &WriteTransaction, notification: &StoredNotification) -> StoreResult<()> {
        write_doc(
            &mut txn.open_table(NOTIFICATIONS)?,
            &notification.id,
            notification,
        )?;
        let key = scoped_key(&notification.to, notification.created_at, &notification.id);
        txn.open_table(NOTIFICATION_INDEX)?
            .insert(key.as_slice(), notification.id.as_str())?;
        Ok(())
    }
}
