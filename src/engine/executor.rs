//! Action dispatcher

use std::collections::BTreeSet;
use std::io::{self, Stdout, Write};

use log::info;
use serde::Serialize;

use super::commands::{self, BuildOptions, LaunchSpec};
use crate::config::Config;
use crate::error::{DldError, Result};
use crate::host;
use crate::output::log_line;
use crate::project::Project;
use crate::runtime::{self, Invocation, Runner};

/// Execution context containing runtime configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Log invocations without running anything
    pub dry_run: bool,
    /// Pick a free port block instead of the configured ports
    pub autoports: bool,
}

/// Host-side overrides shared by `run-jl` and `run-it-rm`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Replaces the configured mountpoint
    pub mountpoint: Option<String>,
    /// Mounted in addition to the primary one
    pub mountpoints: Vec<String>,
    pub memory: Option<String>,
}

/// Summary printed by `info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoReport {
    pub base_image: String,
    pub lab_image: String,
    pub lab_container: String,
    pub mountpoint: String,
    pub notebook_dir: String,
    pub sshd_port: String,
    pub jupyterlab_port: String,
    pub tensorboard_port: String,
    pub conflicting_ports: Vec<String>,
    pub taken_ports: Vec<u32>,
}

/// Runs actions for one resolved configuration
pub struct Dispatcher<R: Runner, W: Write = Stdout> {
    config: Config,
    project: Project,
    ctx: ExecutionContext,
    runner: R,
    out: W,
}

impl<R: Runner> Dispatcher<R, Stdout> {
    pub fn new(config: Config, project: Project, ctx: ExecutionContext, runner: R) -> Self {
        Self {
            config,
            project,
            ctx,
            runner,
            out: io::stdout(),
        }
    }
}

impl<R: Runner, W: Write> Dispatcher<R, W> {
    /// Send progress lines to `out` instead of stdout
    pub fn with_output<W2: Write>(self, out: W2) -> Dispatcher<R, W2> {
        Dispatcher {
            config: self.config,
            project: self.project,
            ctx: self.ctx,
            runner: self.runner,
            out,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn build(&mut self, opts: BuildOptions) -> Result<()> {
        let invocations = commands::build(&self.config, &self.project, opts);
        self.execute_all(&invocations)
    }

    /// Launch the lab container with JupyterLab, then start sshd in it.
    ///
    /// Fails before running anything when a configured port is taken.
    pub fn run_jl(&mut self, mounts: &MountOptions, notebook_dir: Option<&str>) -> Result<()> {
        let ps = self.published_ports()?;
        let taken = runtime::parse_taken_ports(&ps, None);
        let ports = self.select_ports(&taken);
        if !self.ctx.autoports {
            let conflicts = runtime::conflicting_ports(&ports, &taken);
            if !conflicts.is_empty() {
                return Err(DldError::PortsTaken(conflicts));
            }
        }

        let launch = self.launch_spec(mounts);
        let notebook_dir = notebook_dir
            .filter(|d| !d.is_empty())
            .unwrap_or(self.config.notebook_dir.as_str())
            .to_string();
        let invocations = commands::run_jl(&self.config, &launch, &ports, &notebook_dir);
        self.execute_all(&invocations)
    }

    pub fn run_it_rm(&mut self, mounts: &MountOptions, command: &[String]) -> Result<()> {
        let launch = self.launch_spec(mounts);
        let invocation = commands::run_it_rm(&self.config, &launch, command);
        self.execute(&invocation)
    }

    pub fn start(&mut self) -> Result<()> {
        let invocations = commands::start(&self.config);
        self.execute_all(&invocations)
    }

    pub fn stop(&mut self) -> Result<()> {
        let invocation = commands::stop(&self.config);
        self.execute(&invocation)
    }

    pub fn rmc(&mut self) -> Result<()> {
        let invocation = commands::rmc(&self.config);
        self.execute(&invocation)
    }

    pub fn rmi(&mut self, with_base: bool) -> Result<()> {
        let invocations = commands::rmi(&self.config, with_base);
        self.execute_all(&invocations)
    }

    pub fn exec(&mut self, command: &[String]) -> Result<()> {
        let invocation = commands::exec(&self.config, command);
        self.execute(&invocation)
    }

    /// Configuration summary with current port usage; never destructive.
    ///
    /// Automatic ports are chosen from every taken port, exactly as `run-jl`
    /// would. The lab container's own ports are not reported as conflicts.
    pub fn info(&mut self) -> Result<InfoReport> {
        let own = self.config.lab_container_name.clone();
        let ps = self.published_ports()?;
        let taken = runtime::parse_taken_ports(&ps, None);
        let ports = self.select_ports(&taken);
        let others = runtime::parse_taken_ports(&ps, Some(own.as_str()));
        let conflicting_ports = runtime::conflicting_ports(&ports, &others);
        let [jupyterlab_port, tensorboard_port, sshd_port] = ports;

        Ok(InfoReport {
            base_image: self.config.base_image_name.clone(),
            lab_image: self.config.lab_image_name.clone(),
            lab_container: own,
            mountpoint: self.config.mountpoint.clone(),
            notebook_dir: self.config.notebook_dir.clone(),
            sshd_port,
            jupyterlab_port,
            tensorboard_port,
            conflicting_ports,
            taken_ports: taken.into_iter().collect(),
        })
    }

    /// `docker ps` output, or nothing in a dry run
    fn published_ports(&mut self) -> Result<String> {
        if self.ctx.dry_run {
            info!("dry run: not querying {} for taken ports", self.config.runtime);
            return Ok(String::new());
        }
        runtime::list_published(&mut self.runner, &self.config.runtime)
    }

    /// Configured mappings, or a free block above `taken` with autoports
    fn select_ports(&self, taken: &BTreeSet<u32>) -> [String; 3] {
        if self.ctx.autoports {
            let ports = runtime::auto_port_mappings(taken);
            info!("selected ports automatically: {}", ports.join(", "));
            ports
        } else {
            self.config.ports()
        }
    }

    fn launch_spec(&self, mounts: &MountOptions) -> LaunchSpec {
        let primary = mounts
            .mountpoint
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.mountpoint.as_str());
        let (uid, gid) = host::uid_gid();

        LaunchSpec {
            mounts: std::iter::once(primary)
                .chain(mounts.mountpoints.iter().map(String::as_str))
                .map(host::expand)
                .collect(),
            memory: mounts.memory.clone().filter(|m| !m.is_empty()),
            uid,
            gid,
        }
    }

    /// Run invocations in order, stopping at the first failure
    fn execute_all(&mut self, invocations: &[Invocation]) -> Result<()> {
        for invocation in invocations {
            self.execute(invocation)?;
        }
        Ok(())
    }

    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        log_line(&mut self.out, &format!("running:\n{}", invocation))?;
        if !self.ctx.dry_run {
            self.runner.run(invocation)?;
        }
        log_line(&mut self.out, "finished")?;
        Ok(())
    }
}
