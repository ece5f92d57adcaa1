//! Custom Axum extractors.

pub mod request_id;
pub mod validated;

pub use request_id::RequestId;
pub use validated::{ValidatedJson, ValidatedQuery};
