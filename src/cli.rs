// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(about = "Inspect and drive containers on Docker and Podman hosts")]
#[command(version)]
pub struct Cli {
    /// Host to talk to (see `dockhand hosts`)
    #[arg(long, global = true, default_value = "native")]
    pub host: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured and discovered hosts
    Hosts,

    /// Show a container's configuration
    Inspect {
        /// Container ID or name
        id: String,
        /// Bypass the cached configuration
        #[arg(long)]
        fresh: bool,
    },

    /// Start a container
    Start {
        /// Container ID or name
        id: String,
    },

    /// Stop a container
    Stop {
        /// Container ID or name
        id: String,
    },

    /// Remove a container, stopping it first
    Rm {
        /// Container ID or name
        id: String,
        /// Kill the container if it is still running
        #[arg(short, long)]
        force: bool,
        /// Also remove anonymous volumes
        #[arg(long)]
        volumes: bool,
    },

    /// List named volumes mounted into a container
    Volumes {
        /// Container ID or name
        id: String,
    },

    /// List networks a container is attached to
    Networks {
        /// Container ID or name
        id: String,
    },
}
