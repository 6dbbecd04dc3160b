// ABOUTME: Immutable description of a runtime host and the endpoint derived from it.
// ABOUTME: An Endpoint is what every runtime client call is addressed to.

use super::certificates::CertificatePaths;
use crate::types::HostUri;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name given to the host backed by the local runtime.
pub const NATIVE_HOST: &str = "native";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host {0} has no address")]
    NoAddress(String),

    #[error("unknown host: {0}")]
    UnknownHost(String),
}

/// How to reach one runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDescriptor {
    name: String,
    uri: Option<HostUri>,
    is_native: bool,
    cert_dir: Option<PathBuf>,
}

impl HostDescriptor {
    /// A remote host, usually a provisioned machine.
    pub fn remote(name: impl Into<String>, uri: Option<HostUri>, cert_dir: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            uri,
            is_native: false,
            cert_dir,
        }
    }

    /// The local runtime.
    pub fn native(uri: Option<HostUri>, cert_dir: Option<PathBuf>) -> Self {
        Self {
            name: NATIVE_HOST.to_string(),
            uri,
            is_native: true,
            cert_dir,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> Option<&HostUri> {
        self.uri.as_ref()
    }

    pub fn is_native(&self) -> bool {
        self.is_native
    }

    pub fn cert_dir(&self) -> Option<&Path> {
        self.cert_dir.as_deref()
    }

    pub fn certificates(&self) -> Option<CertificatePaths> {
        self.cert_dir.as_ref().map(CertificatePaths::from_dir)
    }

    /// Endpoint for runtime calls.
    ///
    /// A native host without an address uses the engine's local defaults; a
    /// remote host without one (a stopped machine) cannot be reached.
    pub fn endpoint(&self) -> Result<Endpoint, HostError> {
        if self.uri.is_none() && !self.is_native {
            return Err(HostError::NoAddress(self.name.clone()));
        }
        Ok(Endpoint {
            uri: self.uri.clone(),
            certificates: self.certificates(),
        })
    }
}

impl fmt::Display for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uri {
            Some(uri) => write!(f, "{} ({})", self.name, uri),
            None => write!(f, "{} (default)", self.name),
        }
    }
}

/// Address plus credentials for runtime calls.
///
/// `uri == None` means the engine's local defaults (`DOCKER_HOST` or the
/// standard socket).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub uri: Option<HostUri>,
    pub certificates: Option<CertificatePaths>,
}

impl Endpoint {
    pub fn new(uri: Option<HostUri>, certificates: Option<CertificatePaths>) -> Self {
        Self { uri, certificates }
    }

    /// Local defaults, no TLS.
    pub fn local() -> Self {
        Self::default()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uri {
            Some(uri) => write!(f, "{uri}"),
            None => write!(f, "local defaults"),
        }
    }
}
