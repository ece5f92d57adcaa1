//! # vidvault-api
//!
//! HTTP API layer for VidVault built on Axum.
//!
//! Provides the folder, video, and health endpoints, request validation,
//! error mapping, and the partial-content streaming response.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
