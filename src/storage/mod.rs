//! In-memory link storage
//!
//! Everything lives for the lifetime of the process; there is no backend.

pub mod link_store;
pub mod models;

pub use link_store::{CodeGenerator, LinkStore, StoreSettings};
pub use models::{AccessRecord, LinkDetails, LinkRecord, StoreStats};
