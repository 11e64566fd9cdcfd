//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Handlers talk to the `MessageStore` trait, never to the pool
//! - "No rows" is classified here as `DbError::NotFound`
//! - Store error detail stays server-side

pub mod memory;
pub mod messages;

pub use memory::MemoryMessageStore;
pub use messages::{DbError, MessageStore, PgMessageRepo, LIST_LIMIT};
