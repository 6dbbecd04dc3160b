// ABOUTME: Runtime endpoints: host descriptors, TLS material, machine enumeration and discovery.
// ABOUTME: Everything needed to decide where a runtime call goes and with which credentials.

mod certificates;
mod descriptor;
mod discovery;
mod machine;

pub use certificates::CertificatePaths;
pub use descriptor::{Endpoint, HostDescriptor, HostError, NATIVE_HOST};
pub use discovery::{DOCKER_CERT_PATH, Hosts, discover};
pub use machine::{DockerMachine, MachineDetail, MachineError, MachineInfo, MachineOps};
