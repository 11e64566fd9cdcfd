//! Command implementations for the msgboard CLI

pub mod init_db;
pub mod serve;

use anyhow::Result;
use clap::Args;
use msgboard_server::config::parse_ssl_mode;
use msgboard_server::DbConfig;

pub use init_db::run_init_db;
pub use serve::run_serve;

/// Database flags shared by every command that opens the store.
///
/// Flags override `DB_*` environment variables, which override defaults.
#[derive(Args, Debug, Default)]
pub struct DbArgs {
    /// Database host [env: DB_HOST, default: db]
    #[arg(long)]
    pub db_host: Option<String>,

    /// Database port [env: DB_PORT, default: 5432]
    #[arg(long)]
    pub db_port: Option<u16>,

    /// Database user [env: DB_USER, default: app]
    #[arg(long)]
    pub db_user: Option<String>,

    /// Database password [env: DB_PASSWORD, default: app]
    #[arg(long)]
    pub db_password: Option<String>,

    /// Database name [env: DB_NAME, default: app]
    #[arg(long)]
    pub db_name: Option<String>,

    /// TLS mode: disable, allow, prefer, require, verify-ca, verify-full [env: DB_SSLMODE]
    #[arg(long)]
    pub db_sslmode: Option<String>,
}

impl DbArgs {
    /// Apply flag overrides on top of an environment-derived config.
    pub fn apply(self, config: &mut DbConfig) -> Result<()> {
        if let Some(host) = self.db_host {
            config.host = host;
        }
        if let Some(port) = self.db_port {
            config.port = port;
        }
        if let Some(user) = self.db_user {
            config.user = user;
        }
        if let Some(password) = self.db_password {
            config.password = password;
        }
        if let Some(name) = self.db_name {
            config.name = name;
        }
        if let Some(mode) = self.db_sslmode {
            config.ssl_mode = parse_ssl_mode(&mode)?;
        }
        Ok(())
    }
}
