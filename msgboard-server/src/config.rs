//! Server configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `APP_ADDR`: listen address (default: `:8080`, all interfaces)
//! - `APP_CORS_PERMISSIVE`: allow any origin (default: false)
//! - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_SSLMODE`
//!
//! An empty variable is treated the same as an unset one.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::error::{Error, Result};

const DEFAULT_ADDR: &str = ":8080";

/// Database connection parameters
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            port: 5432,
            user: "app".to_string(),
            password: "app".to_string(),
            name: "app".to_string(),
            ssl_mode: PgSslMode::Disable,
        }
    }
}

impl DbConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            host: get("DB_HOST").unwrap_or(defaults.host),
            port: match get("DB_PORT") {
                Some(port) => parse_port(&port)?,
                None => defaults.port,
            },
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD").unwrap_or(defaults.password),
            name: get("DB_NAME").unwrap_or(defaults.name),
            ssl_mode: match get("DB_SSLMODE") {
                Some(mode) => parse_ssl_mode(&mode)?,
                None => defaults.ssl_mode,
            },
        })
    }

    /// Build sqlx connect options
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode)
    }
}

/// Process-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, Go-style `:PORT` accepted
    pub addr: String,
    pub cors_permissive: bool,
    pub db: DbConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            cors_permissive: false,
            db: DbConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("APP_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let cors_permissive = match lookup("APP_CORS_PERMISSIVE").filter(|v| !v.is_empty()) {
            Some(v) => parse_bool("APP_CORS_PERMISSIVE", &v)?,
            None => false,
        };

        Ok(Self {
            addr,
            cors_permissive,
            db: DbConfig::from_lookup(lookup)?,
        })
    }
}

/// Normalize a listen address for binding.
///
/// `:8080` binds every interface, matching the conventional shorthand.
pub fn listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

pub fn parse_port(value: &str) -> Result<u16> {
    value
        .parse()
        .map_err(|_| Error::config(format!("invalid DB_PORT '{}'", value)))
}

pub fn parse_ssl_mode(value: &str) -> Result<PgSslMode> {
    PgSslMode::from_str(value)
        .map_err(|_| Error::config(format!("invalid DB_SSLMODE '{}'", value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(Error::config(format!("invalid {} '{}'", key, value))),
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
