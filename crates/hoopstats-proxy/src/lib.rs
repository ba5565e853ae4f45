//! Axum relay server.
//!
//! This crate provides:
//! - Same-origin `/api` surface for the browser frontend
//! - Transparent forwarding of uploads, status checks and downloads to the
//!   analysis gateway, with long deadlines for whole-video transfers
//! - Request logging, request ids and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use routes::create_router;
pub use state::AppState;
