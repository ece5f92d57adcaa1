//! PostgreSQL-backed stores.

pub mod folder;
pub mod video;

pub use folder::PgFolderStore;
pub use video::PgVideoStore;
