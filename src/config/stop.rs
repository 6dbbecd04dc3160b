// ABOUTME: Container stop configuration.
// ABOUTME: Grace period before a stopping container is killed.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StopConfig {
    /// `None` leaves the grace period to the engine.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}
