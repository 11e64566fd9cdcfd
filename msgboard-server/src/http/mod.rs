//! HTTP server layer
//!
//! Axum server with:
//! - Four routes under /api
//! - Plain-text error responses
//! - Per-request logging
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{
    build_router, run_server, serve_with_grace, shutdown_signal, ServerConfig, Shutdown,
};
