// ABOUTME: Validated address of a container runtime endpoint.
// ABOUTME: Handles unix:///path/to.sock and tcp://host:port forms.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseHostUriError {
    #[error("host address cannot be empty")]
    Empty,

    #[error("unsupported scheme in host address: {0}")]
    UnsupportedScheme(String),

    #[error("unix socket path must be absolute: {0}")]
    RelativeSocketPath(String),

    #[error("tcp address must be host:port: {0}")]
    MissingPort(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("hostname cannot be empty")]
    EmptyHost,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostUri {
    Unix(PathBuf),
    Tcp { host: String, port: u16 },
}

impl HostUri {
    pub fn parse(input: &str) -> Result<Self, ParseHostUriError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseHostUriError::Empty);
        }

        let Some((scheme, rest)) = input.split_once("://") else {
            return Err(ParseHostUriError::UnsupportedScheme(input.to_string()));
        };

        match scheme {
            "unix" => {
                if !rest.starts_with('/') {
                    return Err(ParseHostUriError::RelativeSocketPath(rest.to_string()));
                }
                Ok(HostUri::Unix(PathBuf::from(rest)))
            }
            "tcp" => {
                let rest = rest.trim_end_matches('/');
                let Some((host, port)) = rest.rsplit_once(':') else {
                    return Err(ParseHostUriError::MissingPort(rest.to_string()));
                };
                if host.is_empty() {
                    return Err(ParseHostUriError::EmptyHost);
                }
                let port = port
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| ParseHostUriError::InvalidPort(port.to_string()))?;
                Ok(HostUri::Tcp {
                    host: host.to_string(),
                    port,
                })
            }
            other => Err(ParseHostUriError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn unix(path: impl Into<PathBuf>) -> Self {
        HostUri::Unix(path.into())
    }

    pub fn is_unix(&self) -> bool {
        matches!(self, HostUri::Unix(_))
    }

    pub fn is_tcp(&self) -> bool {
        matches!(self, HostUri::Tcp { .. })
    }

    /// Socket path for unix addresses.
    pub fn socket_path(&self) -> Option<&Path> {
        match self {
            HostUri::Unix(path) => Some(path),
            HostUri::Tcp { .. } => None,
        }
    }

    /// `host:port` for tcp addresses.
    pub fn authority(&self) -> Option<String> {
        match self {
            HostUri::Tcp { host, port } => Some(format!("{host}:{port}")),
            HostUri::Unix(_) => None,
        }
    }
}

impl fmt::Display for HostUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostUri::Unix(path) => write!(f, "unix://{}", path.display()),
            HostUri::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
        }
    }
}

impl std::str::FromStr for HostUri {
    type Err = ParseHostUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostUri::parse(s)
    }
}

impl Serialize for HostUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HostUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HostUri::parse(&s).map_err(serde::de::Error::custom)
    }
}
