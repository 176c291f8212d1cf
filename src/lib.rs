//! Asciimation - ASCII-art movie streaming over Server-Sent Events
//!
//! This library crate exposes the core functionality for integration testing.

pub mod access_log;
pub mod config;
pub mod player;
pub mod server;
