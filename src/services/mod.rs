//! Domain-side services shared by the HTTP handlers

pub mod events;

pub use events::{LinkEventLogger, RequestMeta};
