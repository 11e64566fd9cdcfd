//! HTTP server command
//!
//! Loads configuration, opens the database, ensures the schema and serves
//! the API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use msgboard_server::AppConfig;

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to [env: APP_ADDR, default: :8080]
    #[arg(long, short = 'b')]
    pub addr: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    /// Resolve flags over environment over defaults.
    pub fn into_config(self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env().context("Invalid environment configuration")?;

        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        config.cors_permissive |= self.cors_permissive;
        self.db.apply(&mut config.db)?;

        Ok(config)
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.into_config()?;

    tracing::info!(
        addr = %config.addr,
        db_host = %config.db.host,
        db_port = config.db.port,
        db_name = %config.db.name,
        "Starting msgboard server"
    );

    // Run server (blocks until shutdown)
    msgboard_server::serve(config)
        .await
        .context("Server error")?;

    Ok(())
}
