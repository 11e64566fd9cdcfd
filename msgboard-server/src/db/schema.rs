//! Schema bootstrap for the messages table
//!
//! There is no migration framework; the single table is created with
//! `IF NOT EXISTS` on every startup.

use std::time::Duration;

use sqlx::PgPool;

use crate::error::{Error, Result};

/// Bound on the schema statement.
pub const SCHEMA_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id BIGSERIAL PRIMARY KEY,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Ensure the `messages` table exists. Safe to run repeatedly.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Ensuring messages schema...");

    match tokio::time::timeout(SCHEMA_TIMEOUT, sqlx::query(CREATE_MESSAGES).execute(pool)).await {
        Ok(Ok(_)) => {
            tracing::info!("Messages schema ready");
            Ok(())
        }
        Ok(Err(e)) => Err(Error::Schema(e)),
        Err(_) => Err(Error::SchemaTimeout(SCHEMA_TIMEOUT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_is_idempotent() {
        assert!(CREATE_MESSAGES.contains("CREATE TABLE IF NOT EXISTS messages"));
        assert!(CREATE_MESSAGES.contains("content TEXT NOT NULL"));
        assert!(CREATE_MESSAGES.contains("DEFAULT NOW()"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ensure_schema_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");

        ensure_schema(&pool).await.expect("first run failed");
        ensure_schema(&pool).await.expect("second run failed");

        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = 'messages')",
        )
        .fetch_one(&pool)
        .await
        .expect("query failed");
        assert!(exists.0);
    }
}
