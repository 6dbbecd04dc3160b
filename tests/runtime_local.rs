// ABOUTME: Integration tests against the local Docker/Podman daemon.
// ABOUTME: Skipped when no native runtime socket is found.

mod support;

use dockhand::host::{Endpoint, HostDescriptor};
use dockhand::runtime::{
    BollardClient, ContainerError, ContainerOps, NetworkOps, VolumeError, VolumeOps,
    detect_native,
};
use dockhand::service::{ContainerService, ServiceErrorKind, ServiceOptions, ServiceState};
use dockhand::types::{ContainerId, HostUri};
use std::sync::Arc;

/// Native host and its endpoint, if a local runtime is available.
fn local_host() -> Option<(HostDescriptor, Endpoint)> {
    let native = detect_native();
    let info = native.info()?;
    let host = HostDescriptor::native(Some(HostUri::unix(&info.socket_path)), None);
    let endpoint = host.endpoint().ok()?;
    Some((host, endpoint))
}

/// Skip test if no local runtime available.
macro_rules! require_runtime {
    () => {
        match local_host() {
            Some(host) => host,
            None => {
                eprintln!("Skipping test: no local container runtime found");
                return;
            }
        }
    };
}

const MISSING: &str = "dockhand-test-definitely-missing";

#[tokio::test]
async fn inspecting_missing_container_is_not_found() {
    support::init_tracing();
    let (_, endpoint) = require_runtime!();
    let client = BollardClient::new();

    let result = client
        .inspect_container(&endpoint, &ContainerId::new(MISSING))
        .await;

    assert!(
        matches!(result, Err(ContainerError::NotFound(_))),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn inspecting_missing_volume_is_not_found() {
    let (_, endpoint) = require_runtime!();
    let client = BollardClient::new();

    let result = client
        .inspect_volumes(&endpoint, &[MISSING.to_string()])
        .await;

    assert!(
        matches!(result, Err(VolumeError::NotFound(_))),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn runtime_lists_default_networks() {
    let (_, endpoint) = require_runtime!();
    let client = BollardClient::new();

    let networks = client
        .list_networks(&endpoint)
        .await
        .expect("should list networks");

    assert!(!networks.is_empty(), "a runtime always has a default network");
    assert!(networks.iter().all(|n| !n.id.is_empty()));
}

#[tokio::test]
async fn service_over_missing_container_stays_starting() {
    let (host, endpoint) = require_runtime!();
    let svc = ContainerService::new(
        "missing",
        ContainerId::new(MISSING),
        host,
        endpoint,
        Arc::new(BollardClient::new()),
        ServiceOptions::default(),
    );

    let err = svc.configuration(false).await.unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::NotFound);

    svc.start().await;
    assert_eq!(svc.state(), ServiceState::Starting);

    // Nothing to tear down, but dispose must still settle quietly
    svc.dispose().await;
}
