//! Axum HTTP API server.
//!
//! This crate provides:
//! - Worker registration, login, and availability management
//! - Geospatial proximity search over available workers
//! - Post upload with image storage, listing, and deletion
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::PostService;
pub use state::AppState;
