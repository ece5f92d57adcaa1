//! # vidvault-database
//!
//! Record stores for folders and videos. The [`store`] traits are what the
//! services consume; [`postgres`] backs them with PostgreSQL through sqlx and
//! [`memory`] keeps everything in process for tests and throwaway runs.

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod store;

pub use connection::{DatabasePool, Stores};
pub use store::{FolderStore, VideoStore};
