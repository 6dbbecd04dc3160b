// ABOUTME: Container commands driving a ContainerService bound from the CLI.
// ABOUTME: Transitions that do not reach their target state are reported as errors.

use dockhand::config::Config;
use dockhand::error::{Error, Result};
use dockhand::host::{HostDescriptor, Hosts, NATIVE_HOST};
use dockhand::output::Output;
use dockhand::runtime::BollardClient;
use dockhand::service::{ContainerService, DisposePolicy, ServiceOptions, ServiceState};
use dockhand::types::ContainerId;
use std::sync::Arc;

/// Bind a service to `id` on the named host.
///
/// The CLI never tears a container down on exit, whatever the config says.
pub fn bind_service(
    hosts: &Hosts,
    host: &str,
    id: &str,
    config: &Config,
) -> Result<ContainerService> {
    let descriptor = match hosts.get(host) {
        Ok(descriptor) => descriptor.clone(),
        // Engine defaults still apply when no local socket was detected
        Err(_) if host == NATIVE_HOST => HostDescriptor::native(None, None),
        Err(e) => return Err(e.into()),
    };
    let endpoint = descriptor.endpoint()?;
    tracing::debug!(host = %descriptor, container_id = id, "binding container service");

    let options = ServiceOptions {
        dispose: DisposePolicy::keep(),
        ..config.service_options()
    };
    Ok(ContainerService::new(
        id,
        ContainerId::new(id),
        descriptor,
        endpoint,
        Arc::new(BollardClient::new()),
        options,
    ))
}

pub async fn inspect(service: &ContainerService, fresh: bool, output: &Output) -> Result<()> {
    let config = service.configuration(fresh).await?;
    let summary = format!(
        "{}  {}  {}  {:?}",
        config.id.short(),
        config.name,
        config.image,
        config.status.state
    );
    output.record("container", config.as_ref(), summary);
    Ok(())
}

pub async fn start(service: &ContainerService, output: &Output) -> Result<()> {
    service.start().await;
    expect_state(service, "start", ServiceState::Running)?;
    output.success(&format!("started {}", service.id()));
    Ok(())
}

pub async fn stop(service: &ContainerService, output: &Output) -> Result<()> {
    service.stop().await;
    expect_state(service, "stop", ServiceState::Stopped)?;
    output.success(&format!("stopped {}", service.id()));
    Ok(())
}

pub async fn remove(
    service: &ContainerService,
    force: bool,
    volumes: bool,
    output: &Output,
) -> Result<()> {
    service.remove(force, volumes).await;
    expect_state(service, "remove", ServiceState::Removed)?;
    output.success(&format!("removed {}", service.id()));
    Ok(())
}

pub async fn volumes(service: &ContainerService, output: &Output) -> Result<()> {
    for volume in service.volumes().await? {
        output.record("volume", &volume, &volume);
    }
    Ok(())
}

pub async fn networks(service: &ContainerService, output: &Output) -> Result<()> {
    for network in service.networks().await? {
        output.record("network", &network, &network);
    }
    Ok(())
}

fn expect_state(
    service: &ContainerService,
    operation: &'static str,
    expected: ServiceState,
) -> Result<()> {
    let state = service.state();
    if state == expected {
        return Ok(());
    }
    Err(Error::Transition {
        id: service.id().to_string(),
        operation,
        state,
    })
}
