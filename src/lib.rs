//! Snaplink - a small in-memory URL shortener
//!
//! Maps long URLs to short codes, redirects visitors and keeps per-link click
//! history for the lifetime of the process.
//!
//! # Architecture
//! - `storage`: the link store (records and click history)
//! - `api`: HTTP handlers, request logging middleware and wire types
//! - `services`: link lifecycle event logging
//! - `config`: configuration loading and command-line flags
//! - `runtime`: shared state and the HTTP server
//! - `system`: logging initialization

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
