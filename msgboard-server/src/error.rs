//! Error types for msgboard-server startup and shutdown
//!
//! Request-time failures live in [`crate::db::DbError`] and
//! [`crate::http::ApiError`]; everything here is fatal to the process.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Environment or flag value could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store refused the connection or the ping failed
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database ping timed out after {}s", .0.as_secs())]
    ConnectionTimeout(Duration),

    /// Creating the messages table failed
    #[error("Database schema failed: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("Database schema timed out after {}s", .0.as_secs())]
    SchemaTimeout(Duration),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}
