//! # vidvault-entity
//!
//! Domain entity models for VidVault. Every struct in this crate represents
//! a stored record or a composed read view. Stored records additionally
//! derive `sqlx::FromRow`.

pub mod folder;
pub mod video;
