//! Resolve a configuration layer against defaults into a [`Config`]

use log::debug;

use super::types::{Config, ConfigFile};
use crate::error::{DldError, Result};

pub const DEFAULT_IMAGE_PREFIX: &str = "dld";
pub const DEFAULT_IMAGE_USER: &str = "master";
pub const DEFAULT_HOSTNAME: &str = "dl-server";
pub const DEFAULT_NOTEBOOK_DIR: &str = "/workspace/projects";
pub const DEFAULT_MOUNTPOINT: &str = "$HOME/projects:/workspace/projects";
pub const DEFAULT_JUPYTERLAB_PORT: &str = "8889:8888";
pub const DEFAULT_TENSORBOARD_PORT: &str = "8899:6006";
pub const DEFAULT_SSHD_PORT: &str = "8890:22";
pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_GPU_RUNTIME: &str = "nvidia-docker";
pub const DEFAULT_JUPYTER_TOKEN: &str = "dlservertoken";

/// Tag shared by every generated image name
const IMAGE_TAG: &str = "gpu";

/// Resolve `layer` against `defaults`.
///
/// `name` is the configuration name (used for the container suffix) and
/// `user` the OS user name (used for the container prefix). Neither input
/// layer is modified.
pub fn resolve(layer: &ConfigFile, defaults: &ConfigFile, name: &str, user: &str) -> Result<Config> {
    let merged = layer.layered_over(defaults);

    let lab_dockerfile =
        non_empty(&merged.lab_dockerfile).ok_or(DldError::MissingField("lab_dockerfile"))?;
    let image_prefix = or_literal(&merged.image_prefix, DEFAULT_IMAGE_PREFIX);

    let base_image_name = non_empty(&merged.base_image_name).unwrap_or_else(|| {
        image_name(&image_prefix, "base", merged.base_image_suffix.as_deref())
    });
    let lab_image_name = non_empty(&merged.lab_image_name).unwrap_or_else(|| {
        image_name(&image_prefix, "lab", merged.lab_image_suffix.as_deref())
    });

    let lab_container_name = match non_empty(&merged.lab_container_name) {
        Some(container) => container,
        None => {
            let prefix = match non_empty(&merged.lab_container_prefix) {
                Some(prefix) => prefix,
                None => {
                    let user = merged
                        .user_aliases
                        .get(user)
                        .map(String::as_str)
                        .unwrap_or(user);
                    // a leading `-` would make the name parse as a docker flag
                    if user.is_empty() {
                        return Err(DldError::MissingField("lab_container_prefix"));
                    }
                    format!("{}-", user)
                }
            };
            let suffix = match non_empty(&merged.lab_container_suffix) {
                Some(suffix) => dashed(&suffix),
                None => format!("-{}", name),
            };
            format!("{}lab{}", prefix, suffix)
        }
    };

    let config = Config {
        name: name.to_string(),
        base_dockerfile: non_empty(&merged.base_dockerfile),
        lab_dockerfile,
        base_image_name,
        lab_image_name,
        lab_container_name,
        image_user: or_literal(&merged.image_user, DEFAULT_IMAGE_USER),
        hostname: or_literal(&merged.hostname, DEFAULT_HOSTNAME),
        notebook_dir: or_literal(&merged.notebook_dir, DEFAULT_NOTEBOOK_DIR),
        mountpoint: or_literal(&merged.mountpoint, DEFAULT_MOUNTPOINT),
        jupyterlab_port: or_literal(&merged.jupyterlab_port, DEFAULT_JUPYTERLAB_PORT),
        tensorboard_port: or_literal(&merged.tensorboard_port, DEFAULT_TENSORBOARD_PORT),
        sshd_port: or_literal(&merged.sshd_port, DEFAULT_SSHD_PORT),
        runtime: or_literal(&merged.runtime, DEFAULT_RUNTIME),
        gpu_runtime: or_literal(&merged.gpu_runtime, DEFAULT_GPU_RUNTIME),
        jupyter_token: or_literal(&merged.jupyter_token, DEFAULT_JUPYTER_TOKEN),
    };

    debug!("resolved configuration '{}': {:?}", name, config);
    Ok(config)
}

/// `{prefix}/{role}{-suffix}:gpu`
pub fn image_name(prefix: &str, role: &str, suffix: Option<&str>) -> String {
    let suffix = suffix.map(dashed).unwrap_or_default();
    format!("{}/{}{}:{}", prefix, role, suffix, IMAGE_TAG)
}

/// Prepend `-` unless the value is empty or already starts with one
fn dashed(suffix: &str) -> String {
    if suffix.is_empty() || suffix.starts_with('-') {
        suffix.to_string()
    } else {
        format!("-{}", suffix)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

fn or_literal(value: &Option<String>, literal: &str) -> String {
    non_empty(value).unwrap_or_else(|| literal.to_string())
}
