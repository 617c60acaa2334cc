//! HTTP layer: route handlers, middleware and wire types

pub mod middleware;
pub mod services;
pub mod types;

pub use types::ApiSettings;
