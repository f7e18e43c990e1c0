//! CLI argument parsing

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::MountOptions;

#[derive(Parser)]
#[command(name = "dldocker")]
#[command(
    author,
    version,
    about = "Build and run deep learning images and containers",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Configuration containing image tag, container name and build settings
    #[arg(short, long, global = true, default_value = "tf1x")]
    pub config: String,

    /// Print commands without executing them
    #[arg(short, long, global = true)]
    pub dry_run: bool,

    /// Select ports automatically
    #[arg(short, long, global = true)]
    pub autoports: bool,

    /// Directory holding configs/, dockerfiles/ and dockercontext/
    #[arg(long, global = true, env = "DLD_ROOT")]
    pub root: Option<PathBuf>,
}

/// Mount and resource overrides for new containers
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct MountArgs {
    /// Container mount point in format host_path:container_path
    #[arg(long)]
    pub mountpoint: Option<String>,

    /// Additional mount points in format host_path:container_path
    #[arg(short = 'v', long, num_args = 0..)]
    pub mountpoints: Vec<String>,

    /// Memory limit
    #[arg(short, long)]
    pub memory: Option<String>,
}

impl From<MountArgs> for MountOptions {
    fn from(args: MountArgs) -> Self {
        MountOptions {
            mountpoint: args.mountpoint,
            mountpoints: args.mountpoints,
            memory: args.memory,
        }
    }
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Add the directory containing this tool to $PATH in shell rc files
    UpdatePath,

    /// Build the base (unless skipped) and lab images
    Build {
        /// Skip building of the base image
        #[arg(short, long)]
        skip_base: bool,

        /// Do not use cache when building images
        #[arg(long)]
        no_cache: bool,
    },

    /// Run a new container with JupyterLab and sshd
    #[command(name = "run-jl", alias = "run")]
    RunJl {
        #[command(flatten)]
        mounts: MountArgs,

        /// Path to the notebooks directory inside the container
        #[arg(long)]
        notebook_dir: Option<String>,
    },

    /// Run a command interactively in a new container, then delete it
    #[command(name = "run-it-rm", alias = "run-it")]
    RunItRm {
        #[command(flatten)]
        mounts: MountArgs,

        /// Command to run (default: bash)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        container_command: Vec<String>,
    },

    /// Remove the container
    Rmc,

    /// Remove the lab image
    Rmi {
        /// Remove the base image as well
        #[arg(long)]
        with_base: bool,
    },

    /// Start the existing container
    Start,

    /// Stop the running container
    Stop,

    /// Execute a command in the running container (default: bash)
    Exec {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        container_command: Vec<String>,
    },

    /// Print the configuration summary and port usage
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available configurations
    Configs,
}
