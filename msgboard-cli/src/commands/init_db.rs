//! Schema provisioning command

use anyhow::{Context, Result};
use clap::Parser;
use msgboard_server::DbConfig;

use super::DbArgs;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Create the messages table if missing, then exit
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let mut config = DbConfig::from_env().context("Invalid environment configuration")?;
    args.db.apply(&mut config)?;

    msgboard_server::init_db(&config)
        .await
        .with_context(|| format!("Failed to initialize database on {}:{}", config.host, config.port))?;

    tracing::info!(database = %config.name, "Database schema ready");
    Ok(())
}
