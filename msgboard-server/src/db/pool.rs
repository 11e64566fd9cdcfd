//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and a bounded
//! reachability check before the pool is handed out.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool};

use crate::config::DbConfig;
use crate::error::{Error, Result};

/// Maximum open connections.
pub const MAX_CONNECTIONS: u32 = 10;

/// Lifetime cap before a connection is recycled.
pub const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Idle connections beyond `min_connections` are closed after this long.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Bound on the startup ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on waiting for checked-out connections when the pool closes.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool options with the static limits applied.
///
/// sqlx caps idle connections by age rather than by count: nothing is
/// opened ahead of demand and idle ones are reaped after [`IDLE_TIMEOUT`].
/// Request-time acquires keep sqlx's own acquire timeout; only the
/// startup ping is held to [`PING_TIMEOUT`].
pub fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(0)
        .max_lifetime(MAX_LIFETIME)
        .idle_timeout(IDLE_TIMEOUT)
}

/// Create a PostgreSQL connection pool and verify the store answers.
///
/// The pool is built lazily, then one connection is acquired and pinged
/// within [`PING_TIMEOUT`]. On failure the pool is closed before the
/// error is returned.
///
/// # Example
///
/// ```ignore
/// let pool = connect(&DbConfig::from_env()?).await?;
/// ```
pub async fn connect(config: &DbConfig) -> Result<PgPool> {
    let pool = pool_options().connect_lazy_with(config.connect_options());

    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Connecting to database"
    );

    match tokio::time::timeout(PING_TIMEOUT, ping(&pool)).await {
        Ok(Ok(())) => Ok(pool),
        Ok(Err(e)) => {
            pool.close().await;
            Err(Error::Connection(e))
        }
        Err(_) => {
            pool.close().await;
            Err(Error::ConnectionTimeout(PING_TIMEOUT))
        }
    }
}

/// Acquire a connection and ping it.
pub async fn ping(pool: &PgPool) -> std::result::Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}

/// Close the pool, waiting at most [`CLOSE_TIMEOUT`] for connections
/// still checked out. Returns false if some were abandoned.
pub async fn close(pool: &PgPool) -> bool {
    match tokio::time::timeout(CLOSE_TIMEOUT, pool.close()).await {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!(
                open = pool.size(),
                "Database pool close timed out, abandoning connections"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_limits() {
        let options = pool_options();
        assert_eq!(options.get_max_connections(), MAX_CONNECTIONS);
        assert_eq!(options.get_min_connections(), 0);
        assert_eq!(options.get_max_lifetime(), Some(MAX_LIFETIME));
        assert_eq!(options.get_idle_timeout(), Some(IDLE_TIMEOUT));
    }

    #[test]
    fn request_acquires_are_not_held_to_startup_bound() {
        assert!(pool_options().get_acquire_timeout() > PING_TIMEOUT);
    }

    #[tokio::test]
    async fn close_returns_promptly_for_idle_pool() {
        let pool = pool_options().connect_lazy_with(DbConfig::default().connect_options());
        assert!(close(&pool).await);
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn unreachable_host_fails_within_timeout() {
        // Port 1 on loopback refuses immediately on any sane host
        let config = DbConfig {
            host: "127.0.0.1".into(),
            port: 1,
            ..DbConfig::default()
        };

        let started = std::time::Instant::now();
        let err = connect(&config).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Connection(_) | Error::ConnectionTimeout(_)
        ));
        assert!(started.elapsed() < PING_TIMEOUT + Duration::from_secs(1));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = pool_options().connect(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = pool_options().connect(&url).await.expect("pool creation failed");

        // More tasks than connections; the pool queues them
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
        assert!(pool.size() <= MAX_CONNECTIONS);
    }
}
