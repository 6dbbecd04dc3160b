// ABOUTME: TLS material used to authenticate against a remote runtime.
// ABOUTME: Resolves the engine's conventional ca.pem/cert.pem/key.pem inside a certificate directory.

use std::path::{Path, PathBuf};

pub const CA_CERTIFICATE: &str = "ca.pem";
pub const CLIENT_CERTIFICATE: &str = "cert.pem";
pub const CLIENT_KEY: &str = "key.pem";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificatePaths {
    pub ca_certificate: PathBuf,
    pub client_certificate: PathBuf,
    pub client_key: PathBuf,
}

impl CertificatePaths {
    /// Paths inside `dir`. Nothing is checked on disk.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            ca_certificate: dir.join(CA_CERTIFICATE),
            client_certificate: dir.join(CLIENT_CERTIFICATE),
            client_key: dir.join(CLIENT_KEY),
        }
    }

    /// Whether all three files are present.
    pub fn exist(&self) -> bool {
        self.ca_certificate.is_file() && self.client_certificate.is_file() && self.client_key.is_file()
    }
}
