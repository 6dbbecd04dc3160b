// ABOUTME: Command module aggregator for the dockhand CLI.
// ABOUTME: Re-exports host listing and container command handlers.

mod container;
mod hosts;

pub use container::{bind_service, inspect, networks, remove, start, stop, volumes};
pub use hosts::{list_hosts, load_hosts};
