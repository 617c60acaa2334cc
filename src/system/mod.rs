//! System-level modules
//!
//! Process concerns that sit outside request handling.

pub mod logging;

pub use logging::{LoggingGuards, init_logging};
