//! dldocker - build and run deep learning development containers
//!
//! Loads a named configuration, fills it in from `defaults.toml`, and drives
//! `docker`/`nvidia-docker` to build images and manage a JupyterLab container
//! with sshd and TensorBoard ports published.
//!
//! # Example
//!
//! ```no_run
//! use dldocker::{Dispatcher, ExecutionContext, Project, SystemRunner};
//!
//! let project = Project::new("/opt/dldocker");
//! let config = project.configs().load("tf1x", "alice").unwrap();
//! let ctx = ExecutionContext { dry_run: true, autoports: false };
//! let mut dispatcher = Dispatcher::new(config, project, ctx, SystemRunner::new());
//! dispatcher.stop().unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod output;
pub mod project;
pub mod runtime;

pub use config::{Config, ConfigDir, ConfigFile};
pub use engine::{BuildOptions, Dispatcher, ExecutionContext, InfoReport, MountOptions};
pub use error::{DldError, Result};
pub use output::{format_output, OutputFormat};
pub use project::Project;
pub use runtime::{Invocation, Runner, SystemRunner};
