//! # vidvault-core
//!
//! Core crate for VidVault. Contains the collaborator traits the services
//! depend on (storage, download, preview), configuration schemas, typed
//! identifiers, media value types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other VidVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
