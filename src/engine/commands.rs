//! Invocation builders for every runtime action
//!
//! These are pure: they turn a resolved [`Config`] plus per-call options into
//! the argument vectors the dispatcher executes.

use crate::config::Config;
use crate::project::Project;
use crate::runtime::Invocation;

pub const SSHD_BINARY: &str = "/usr/sbin/sshd";
/// Command used by `exec` and `run-it-rm` when none is given
pub const DEFAULT_COMMAND: &str = "bash";

/// Options for `build`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub skip_base: bool,
    pub no_cache: bool,
}

/// Host-side settings for a new container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Expanded `host:container` mount specifications, primary first
    pub mounts: Vec<String>,
    pub memory: Option<String>,
    pub uid: u32,
    pub gid: u32,
}

impl LaunchSpec {
    fn apply(&self, inv: Invocation, config: &Config) -> Invocation {
        inv.arg("-e")
            .arg(format!("DLD_UID={}", self.uid))
            .arg("-e")
            .arg(format!("DLD_GID={}", self.gid))
            .arg("--hostname")
            .arg(config.hostname.as_str())
    }
}

/// Base image build (when configured and not skipped), then the lab image
pub fn build(config: &Config, project: &Project, opts: BuildOptions) -> Vec<Invocation> {
    let context = project.build_context().display().to_string();
    let mut invocations = Vec::new();

    if let Some(base) = config.base_dockerfile.as_deref() {
        if !opts.skip_base {
            invocations.push(
                Invocation::new(config.runtime.as_str())
                    .arg("build")
                    .flag_if("--no-cache", opts.no_cache)
                    .arg("-f")
                    .arg(project.dockerfile(base).display().to_string())
                    .arg("-t")
                    .arg(config.base_image_name.as_str())
                    .arg(context.as_str()),
            );
        }
    }

    invocations.push(
        Invocation::new(config.runtime.as_str())
            .arg("build")
            .flag_if("--no-cache", opts.no_cache)
            .arg("-f")
            .arg(project.dockerfile(&config.lab_dockerfile).display().to_string())
            .arg("--build-arg")
            .arg(format!("DLD_BASE={}", config.base_image_name))
            .arg("--build-arg")
            .arg(format!("DLD_USER={}", config.image_user))
            .arg("-t")
            .arg(config.lab_image_name.as_str())
            .arg(context),
    );

    invocations
}

/// Detached JupyterLab container followed by the sshd daemon.
///
/// `ports` are the JupyterLab, TensorBoard and sshd mappings in that order.
pub fn run_jl(
    config: &Config,
    launch: &LaunchSpec,
    ports: &[String; 3],
    notebook_dir: &str,
) -> Vec<Invocation> {
    let mut run = Invocation::new(config.gpu_runtime.as_str()).arg("run").arg("-d");
    run = launch
        .apply(run, config)
        .arg("--name")
        .arg(config.lab_container_name.as_str())
        .repeated("-v", &launch.mounts)
        .repeated("-p", ports.iter())
        .args(["--ipc", "host"])
        .opt("--memory", launch.memory.as_deref())
        .arg(config.lab_image_name.as_str())
        .args(["jupyter", "lab", "--ip", "0.0.0.0", "--no-browser"])
        .arg(format!("--notebook-dir={}", notebook_dir))
        .arg(format!("--LabApp.token={}", config.jupyter_token));

    vec![run, sshd(config)]
}

/// Interactive, auto-removed container running `command`
pub fn run_it_rm(config: &Config, launch: &LaunchSpec, command: &[String]) -> Invocation {
    let run = Invocation::new(config.gpu_runtime.as_str()).args(["run", "-it", "--rm"]);
    launch
        .apply(run, config)
        .repeated("-v", &launch.mounts)
        .args(["--ipc", "host"])
        .opt("--memory", launch.memory.as_deref())
        .arg(config.lab_image_name.as_str())
        .args(container_command(command))
}

/// `docker exec -d -u root <container> /usr/sbin/sshd -D`
pub fn sshd(config: &Config) -> Invocation {
    Invocation::new(config.runtime.as_str())
        .args(["exec", "-d", "-u", "root"])
        .arg(config.lab_container_name.as_str())
        .args([SSHD_BINARY, "-D"])
}

pub fn start(config: &Config) -> Vec<Invocation> {
    vec![
        Invocation::new(config.gpu_runtime.as_str())
            .arg("start")
            .arg(config.lab_container_name.as_str()),
        sshd(config),
    ]
}

pub fn stop(config: &Config) -> Invocation {
    Invocation::new(config.runtime.as_str())
        .arg("stop")
        .arg(config.lab_container_name.as_str())
}

pub fn rmc(config: &Config) -> Invocation {
    Invocation::new(config.runtime.as_str())
        .arg("rm")
        .arg(config.lab_container_name.as_str())
}

/// Remove the lab image, and the base image too when asked and configured
pub fn rmi(config: &Config, with_base: bool) -> Vec<Invocation> {
    let mut invocations = vec![Invocation::new(config.runtime.as_str())
        .arg("rmi")
        .arg(config.lab_image_name.as_str())];
    if with_base && config.base_dockerfile.is_some() {
        invocations.push(
            Invocation::new(config.runtime.as_str())
                .arg("rmi")
                .arg(config.base_image_name.as_str()),
        );
    }
    invocations
}

/// Run `command` in the lab container as the image user
pub fn exec(config: &Config, command: &[String]) -> Invocation {
    Invocation::new(config.runtime.as_str())
        .args(["exec", "-it"])
        .arg(config.lab_container_name.as_str())
        .args(["sudo", "-u"])
        .arg(config.image_user.as_str())
        .args(container_command(command))
}

/// Words of the in-container command.
///
/// Empty means `bash`. A single argument is split shell-style so that
/// `exec "nvidia-smi -l 1"` keeps working; unbalanced quotes leave it whole.
pub fn container_command(command: &[String]) -> Vec<String> {
    match command {
        [] => vec![DEFAULT_COMMAND.to_string()],
        [single] => match shell_words::split(single) {
            Ok(words) if !words.is_empty() => words,
            _ => vec![single.clone()],
        },
        many => many.to_vec(),
    }
}
