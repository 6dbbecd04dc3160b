// ABOUTME: Runtime client capabilities, the bollard-backed client and local runtime detection.
// ABOUTME: Re-exports the traits and types services are written against.

mod client;
mod detection;
pub mod traits;
mod types;

pub use client::BollardClient;
pub use detection::detect_native;
pub use traits::*;
pub use types::{NativeRuntime, RuntimeInfo, RuntimeType};
