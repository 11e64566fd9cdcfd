//! Message repository
//!
//! Translates the four message operations into PostgreSQL queries and
//! classifies driver errors so handlers never see `sqlx::Error` directly.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::pool;
use crate::models::{Message, MessageContent};

/// Maximum messages returned by [`MessageStore::list`].
pub const LIST_LIMIT: i64 = 20;

/// Repository-level error classification
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("insert failed: {0}")]
    Insert(#[source] sqlx::Error),

    #[error("delete failed: {0}")]
    Delete(#[source] sqlx::Error),

    #[error("not found: message '{id}'")]
    NotFound { id: i64 },
}

/// Storage seam for messages (testable)
///
/// Every call is request-scoped: dropping the returned future abandons
/// the in-flight store operation.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Newest messages first, at most [`LIST_LIMIT`].
    async fn list(&self) -> Result<Vec<Message>, DbError>;

    /// Insert a message; the store assigns id and timestamp.
    async fn create(&self, content: MessageContent) -> Result<Message, DbError>;

    /// Remove a message by id.
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

/// PostgreSQL-backed message repository
#[derive(Clone)]
pub struct PgMessageRepo {
    pool: PgPool,
}

impl PgMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// `id` is cast so tables created with a SERIAL (int4) key still decode
// into `i64`.
const LIST_MESSAGES: &str = r#"
SELECT id::int8 AS id, content, created_at
FROM messages
ORDER BY created_at DESC
LIMIT $1
"#;

const INSERT_MESSAGE: &str = r#"
INSERT INTO messages (content)
VALUES ($1)
RETURNING id::int8 AS id, content, created_at
"#;

#[async_trait]
impl MessageStore for PgMessageRepo {
    async fn ping(&self) -> Result<(), DbError> {
        pool::ping(&self.pool).await.map_err(DbError::Unavailable)
    }

    /// A decode failure on any row fails the whole call; no partial list.
    async fn list(&self) -> Result<Vec<Message>, DbError> {
        sqlx::query_as::<_, Message>(LIST_MESSAGES)
            .bind(LIST_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    async fn create(&self, content: MessageContent) -> Result<Message, DbError> {
        sqlx::query_as::<_, Message>(INSERT_MESSAGE)
            .bind(content.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::Insert)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::Delete)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound { id });
        }

        Ok(())
    }
}
