//! msgboard-server: message board HTTP service
//!
//! Short text messages stored in PostgreSQL, exposed as health, list,
//! create and delete endpoints under `/api`.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod state;

use std::future::Future;
use std::sync::Arc;

pub use config::{AppConfig, DbConfig};
pub use error::{Error, Result};
pub use state::AppState;

use db::PgMessageRepo;
use http::ServerConfig;

/// Start the HTTP server and run until Ctrl+C or SIGTERM.
pub async fn serve(config: AppConfig) -> Result<()> {
    serve_until(config, http::shutdown_signal()).await
}

/// Start the HTTP server and run until `shutdown` resolves.
///
/// Connects (fatal on failure), ensures the schema (fatal on failure),
/// serves, and closes the pool once the listener has drained or the
/// grace period has cut off what was left.
pub async fn serve_until<F>(config: AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let pool = db::connect(&config.db).await?;
    tracing::info!(host = %config.db.host, database = %config.db.name, "Database connected");

    if let Err(e) = db::ensure_schema(&pool).await {
        db::close(&pool).await;
        return Err(e);
    }

    let state = AppState::new(Arc::new(PgMessageRepo::new(pool.clone())));
    let server_config = ServerConfig {
        addr: config.addr,
        cors_permissive: config.cors_permissive,
        ..ServerConfig::default()
    };

    let result = http::run_server(state, server_config, shutdown).await;

    if db::close(&pool).await {
        tracing::info!("Database pool closed");
    }
    result.map(|_| ())
}

/// Connect, ensure the schema exists, and disconnect.
pub async fn init_db(config: &DbConfig) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = db::ensure_schema(&pool).await;
    db::close(&pool).await;
    result
}
