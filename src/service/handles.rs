// ABOUTME: Value handles for volumes and networks a container is attached to.
// ABOUTME: Bound to the same endpoint as the container service that produced them.

use serde::Serialize;
use std::fmt;

use crate::host::{CertificatePaths, Endpoint};
use crate::types::NetworkId;

/// A named volume on some host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeService {
    name: String,
    endpoint: Endpoint,
    remove_on_dispose: bool,
}

impl VolumeService {
    pub fn new(name: impl Into<String>, endpoint: Endpoint, remove_on_dispose: bool) -> Self {
        Self {
            name: name.into(),
            endpoint,
            remove_on_dispose,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn certificates(&self) -> Option<&CertificatePaths> {
        self.endpoint.certificates.as_ref()
    }

    /// Volumes discovered on a container are never owned by the handle.
    pub fn remove_on_dispose(&self) -> bool {
        self.remove_on_dispose
    }
}

impl fmt::Display for VolumeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for VolumeService {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("VolumeService", 2)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("endpoint", &self.endpoint.to_string())?;
        s.end()
    }
}

/// A network on some host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkService {
    id: NetworkId,
    name: String,
    endpoint: Endpoint,
}

impl NetworkService {
    pub fn new(id: NetworkId, name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            id,
            name: name.into(),
            endpoint,
        }
    }

    pub fn id(&self) -> &NetworkId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn certificates(&self) -> Option<&CertificatePaths> {
        self.endpoint.certificates.as_ref()
    }
}

impl fmt::Display for NetworkService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id.short())
    }
}

impl Serialize for NetworkService {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("NetworkService", 3)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("endpoint", &self.endpoint.to_string())?;
        s.end()
    }
}
