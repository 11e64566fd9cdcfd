//! In-process message store for tests and local experiments
//!
//! Mirrors the PostgreSQL repository's observable behavior: ids come
//! from a monotonically increasing sequence, timestamps are taken at
//! insert, and listing is newest-first with the same limit.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::messages::{DbError, MessageStore, LIST_LIMIT};
use crate::models::{Message, MessageContent};

#[derive(Debug)]
struct Inner {
    next_id: i64,
    messages: Vec<Message>,
    available: bool,
    writes: usize,
    latency: Duration,
}

/// Mock message store
#[derive(Debug)]
pub struct MemoryMessageStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryMessageStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                messages: Vec::new(),
                available: true,
                writes: 0,
                latency: Duration::ZERO,
            }),
        }
    }
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Delay every operation by `latency` before it touches the data,
    /// like a slow query or a lock wait would.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Number of successful inserts and deletes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn stall(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_available(inner: &Inner) -> Result<(), sqlx::Error> {
        if inner.available {
            Ok(())
        } else {
            Err(sqlx::Error::PoolClosed)
        }
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.stall().await;
        Self::check_available(&self.lock()).map_err(DbError::Unavailable)
    }

    async fn list(&self) -> Result<Vec<Message>, DbError> {
        self.stall().await;
        let inner = self.lock();
        Self::check_available(&inner).map_err(DbError::Query)?;

        let mut messages = inner.messages.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        messages.truncate(LIST_LIMIT as usize);
        Ok(messages)
    }

    async fn create(&self, content: MessageContent) -> Result<Message, DbError> {
        self.stall().await;
        let mut inner = self.lock();
        Self::check_available(&inner).map_err(DbError::Insert)?;

        let message = Message {
            id: inner.next_id,
            content: content.into_string(),
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.writes += 1;
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.stall().await;
        let mut inner = self.lock();
        Self::check_available(&inner).map_err(DbError::Delete)?;

        let before = inner.messages.len();
        inner.messages.retain(|m| m.id != id);
        if inner.messages.len() == before {
            return Err(DbError::NotFound { id });
        }

        inner.writes += 1;
        Ok(())
    }
}
