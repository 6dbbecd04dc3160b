// ABOUTME: Configuration types and parsing for dockhand.yml.
// ABOUTME: Dispose policy, stop timeout, static hosts and discovery switches.

mod hosts;
mod stop;

pub use hosts::HostEntry;
pub use stop::StopConfig;

use crate::error::{Error, Result};
use crate::service::{DisposePolicy, ServiceOptions};
use hosts::RawHostEntry;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "dockhand.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockhand.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockhand/config.yml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "DOCKHAND_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dispose: DisposePolicy,

    #[serde(default)]
    pub stop: StopConfig,

    #[serde(default, deserialize_with = "deserialize_hosts")]
    pub hosts: Vec<HostEntry>,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Which sources `hosts` are discovered from besides the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_true")]
    pub machines: bool,
    #[serde(default = "default_true")]
    pub native: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            machines: true,
            native: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find and load the configuration for `dir`.
    ///
    /// `DOCKHAND_CONFIG`, when set, names the file to load; otherwise the
    /// candidate filenames are tried in order.
    pub fn discover(dir: &Path) -> Result<Self> {
        if let Some(path) = env_override() {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path));
            }
            tracing::debug!(path = %path.display(), "loading configuration from {CONFIG_ENV}");
            return Self::load(&path);
        }

        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like [`Config::discover`], but a missing file yields the defaults.
    /// A `DOCKHAND_CONFIG` naming a missing file is still an error.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) if env_override().is_none() => Ok(Config::default()),
            other => other,
        }
    }

    /// Options for services bound under this configuration.
    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            dispose: self.dispose,
            stop_timeout: self.stop.timeout,
            ..ServiceOptions::default()
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for host in &self.hosts {
            if !seen.insert(host.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "host {} is configured more than once",
                    host.name
                )));
            }
        }
        Ok(())
    }
}

fn env_override() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn deserialize_hosts<'de, D>(deserializer: D) -> std::result::Result<Vec<HostEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<RawHostEntry> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .map(RawHostEntry::into_host_entry)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}
