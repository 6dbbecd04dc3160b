// ABOUTME: Statically configured runtime hosts.
// ABOUTME: Parses entries written as "name=uri" or as a detailed mapping.

use serde::Deserialize;
use std::path::PathBuf;

use crate::host::HostDescriptor;
use crate::types::HostUri;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEntry {
    pub name: String,
    pub uri: HostUri,
    /// Directory holding ca.pem, cert.pem and key.pem.
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
}

impl HostEntry {
    /// Parse the short form `name=uri`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("host entry cannot be empty".to_string());
        }

        let (name, uri) = s
            .split_once('=')
            .ok_or_else(|| format!("expected name=uri, got: {s}"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err("host name cannot be empty".to_string());
        }

        let uri = uri.trim().parse::<HostUri>().map_err(|e| e.to_string())?;
        Ok(HostEntry {
            name: name.to_string(),
            uri,
            cert_path: None,
        })
    }

    pub fn to_descriptor(&self) -> HostDescriptor {
        HostDescriptor::remote(&self.name, Some(self.uri.clone()), self.cert_path.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawHostEntry {
    Simple(String),
    Detailed(HostEntry),
}

impl RawHostEntry {
    pub(super) fn into_host_entry(self) -> Result<HostEntry, String> {
        match self {
            RawHostEntry::Simple(s) => HostEntry::parse(&s),
            RawHostEntry::Detailed(entry) => Ok(entry),
        }
    }
}
