// ABOUTME: Enumeration of provisioned remote machines through the docker-machine tool.
// ABOUTME: Lists machines and reads the TLS certificate directory from machine inspection.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// A machine as listed by the machine tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfo {
    pub name: String,
    /// Runtime URL, absent while the machine is stopped.
    pub url: Option<String>,
    pub state: String,
}

/// Inspection details of one machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineDetail {
    pub name: String,
    pub cert_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("unexpected output from {command}: {reason}")]
    Parse { command: String, reason: String },
}

/// Machine-management layer.
#[async_trait]
pub trait MachineOps: Send + Sync {
    /// Whether the machine tool is installed.
    async fn is_present(&self) -> bool;

    /// List known machines in the tool's order.
    async fn list_machines(&self) -> Result<Vec<MachineInfo>, MachineError>;

    /// Inspect one machine.
    async fn inspect(&self, name: &str) -> Result<MachineDetail, MachineError>;
}

/// `docker-machine` command-line driver.
#[derive(Debug, Clone)]
pub struct DockerMachine {
    binary: PathBuf,
}

impl Default for DockerMachine {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("docker-machine"),
        }
    }
}

impl DockerMachine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, MachineError> {
        let command = format!("{} {}", self.binary.display(), args.join(" "));
        tracing::debug!(%command, "running machine tool");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| MachineError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(MachineError::Failed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl MachineOps for DockerMachine {
    async fn is_present(&self) -> bool {
        self.run(&["version"]).await.is_ok()
    }

    async fn list_machines(&self) -> Result<Vec<MachineInfo>, MachineError> {
        let output = self
            .run(&["ls", "--format", "{{.Name}}\t{{.URL}}\t{{.State}}"])
            .await?;
        Ok(parse_ls(&output))
    }

    async fn inspect(&self, name: &str) -> Result<MachineDetail, MachineError> {
        let output = self.run(&["inspect", name]).await?;
        parse_inspect(&output).map_err(|reason| MachineError::Parse {
            command: format!("inspect {name}"),
            reason,
        })
    }
}

fn parse_ls(output: &str) -> Vec<MachineInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split('\t').map(str::trim);
            let name = fields.next().unwrap_or_default().to_string();
            let url = fields
                .next()
                .filter(|url| !url.is_empty())
                .map(str::to_string);
            let state = fields.next().unwrap_or_default().to_string();
            MachineInfo { name, url, state }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectOutput {
    name: String,
    #[serde(default)]
    host_options: Option<HostOptions>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostOptions {
    #[serde(default)]
    auth_options: Option<AuthOptions>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthOptions {
    #[serde(default)]
    cert_dir: Option<String>,
}

fn parse_inspect(output: &str) -> Result<MachineDetail, String> {
    let parsed: InspectOutput = serde_json::from_str(output).map_err(|e| e.to_string())?;
    let cert_dir = parsed
        .host_options
        .and_then(|h| h.auth_options)
        .and_then(|a| a.cert_dir)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);

    Ok(MachineDetail {
        name: parsed.name,
        cert_dir,
    })
}
