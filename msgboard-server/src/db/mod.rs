//! Database layer - connection pool, schema, and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 10 connections) - no Arc<Mutex<Connection>>
//! - Pool handed to the HTTP layer by injection, never a global
//! - Startup operations bounded by fixed timeouts, request operations
//!   bounded by the request itself

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{close, connect};
pub use repos::*;
pub use schema::ensure_schema;
