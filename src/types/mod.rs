// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod host_uri;
mod id;

pub use host_uri::{HostUri, ParseHostUriError};
pub use id::{ContainerId, NetworkId};
