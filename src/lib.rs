// ABOUTME: Library root for dockhand - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod output;
pub mod runtime;
pub mod service;
pub mod types;
