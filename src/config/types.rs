//! Configuration records
//!
//! A [`ConfigFile`] is one layer read from disk, with every key optional.
//! A [`Config`] is the fully resolved record the dispatcher consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One configuration layer, as written in `configs/<name>.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Dockerfile for the base image; empty disables the base build
    pub base_dockerfile: Option<String>,
    pub lab_dockerfile: Option<String>,

    /// Image tags are generated as `{image_prefix}/{role}{suffix}:gpu`
    pub image_prefix: Option<String>,
    pub base_image_name: Option<String>,
    pub base_image_suffix: Option<String>,
    pub lab_image_name: Option<String>,
    pub lab_image_suffix: Option<String>,

    /// Generated as `{prefix}lab{suffix}` when unset
    pub lab_container_name: Option<String>,
    /// Defaults to `$(whoami)-`
    pub lab_container_prefix: Option<String>,
    /// Defaults to `-{config name}`
    pub lab_container_suffix: Option<String>,

    /// User created inside the image at build time
    pub image_user: Option<String>,
    pub hostname: Option<String>,
    pub notebook_dir: Option<String>,
    /// `HOST_DIR:CONTAINER_DIR`
    pub mountpoint: Option<String>,

    /// `HOST_PORT:CONTAINER_PORT`
    pub jupyterlab_port: Option<String>,
    pub tensorboard_port: Option<String>,
    pub sshd_port: Option<String>,

    pub runtime: Option<String>,
    pub gpu_runtime: Option<String>,
    pub jupyter_token: Option<String>,

    /// OS user name -> container prefix used instead of the user name
    #[serde(default)]
    pub user_aliases: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Merge this layer over `defaults`, returning a new layer.
    ///
    /// A key present on `self` always wins, even when it is an empty string.
    /// Aliases are merged key by key with the same precedence.
    pub fn layered_over(&self, defaults: &ConfigFile) -> ConfigFile {
        fn pick(own: &Option<String>, fallback: &Option<String>) -> Option<String> {
            own.clone().or_else(|| fallback.clone())
        }

        let mut user_aliases = defaults.user_aliases.clone();
        user_aliases.extend(
            self.user_aliases
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        ConfigFile {
            base_dockerfile: pick(&self.base_dockerfile, &defaults.base_dockerfile),
            lab_dockerfile: pick(&self.lab_dockerfile, &defaults.lab_dockerfile),
            image_prefix: pick(&self.image_prefix, &defaults.image_prefix),
            base_image_name: pick(&self.base_image_name, &defaults.base_image_name),
            base_image_suffix: pick(&self.base_image_suffix, &defaults.base_image_suffix),
            lab_image_name: pick(&self.lab_image_name, &defaults.lab_image_name),
            lab_image_suffix: pick(&self.lab_image_suffix, &defaults.lab_image_suffix),
            lab_container_name: pick(&self.lab_container_name, &defaults.lab_container_name),
            lab_container_prefix: pick(&self.lab_container_prefix, &defaults.lab_container_prefix),
            lab_container_suffix: pick(&self.lab_container_suffix, &defaults.lab_container_suffix),
            image_user: pick(&self.image_user, &defaults.image_user),
            hostname: pick(&self.hostname, &defaults.hostname),
            notebook_dir: pick(&self.notebook_dir, &defaults.notebook_dir),
            mountpoint: pick(&self.mountpoint, &defaults.mountpoint),
            jupyterlab_port: pick(&self.jupyterlab_port, &defaults.jupyterlab_port),
            tensorboard_port: pick(&self.tensorboard_port, &defaults.tensorboard_port),
            sshd_port: pick(&self.sshd_port, &defaults.sshd_port),
            runtime: pick(&self.runtime, &defaults.runtime),
            gpu_runtime: pick(&self.gpu_runtime, &defaults.gpu_runtime),
            jupyter_token: pick(&self.jupyter_token, &defaults.jupyter_token),
            user_aliases,
        }
    }
}

/// Fully resolved configuration
///
/// Every string field is non-empty. Built fresh for each invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Name of the configuration file this was resolved from
    pub name: String,
    pub base_dockerfile: Option<String>,
    pub lab_dockerfile: String,
    pub base_image_name: String,
    pub lab_image_name: String,
    pub lab_container_name: String,
    pub image_user: String,
    pub hostname: String,
    pub notebook_dir: String,
    pub mountpoint: String,
    pub jupyterlab_port: String,
    pub tensorboard_port: String,
    pub sshd_port: String,
    pub runtime: String,
    pub gpu_runtime: String,
    pub jupyter_token: String,
}

impl Config {
    /// Configured port mappings in JupyterLab, TensorBoard, sshd order
    pub fn ports(&self) -> [String; 3] {
        [
            self.jupyterlab_port.clone(),
            self.tensorboard_port.clone(),
            self.sshd_port.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_layer_keeps_own_values() {
        let layer = ConfigFile {
            lab_image_suffix: some("tf2x"),
            sshd_port: some("8890:22"),
            ..ConfigFile::default()
        };
        let defaults = ConfigFile {
            lab_image_suffix: some("-tf1x"),
            sshd_port: some("9002:22"),
            hostname: some("dl-server"),
            ..ConfigFile::default()
        };

        let merged = layer.layered_over(&defaults);
        assert_eq!(merged.lab_image_suffix, some("tf2x"));
        assert_eq!(merged.sshd_port, some("8890:22"));
        assert_eq!(merged.hostname, some("dl-server"));
    }

    #[test]
    fn test_layer_fills_every_default_field() {
        let defaults = ConfigFile {
            base_dockerfile: some("Deepo"),
            lab_dockerfile: some("Lab"),
            image_prefix: some("dld"),
            image_user: some("master"),
            notebook_dir: some("/nb"),
            jupyter_token: some("tok"),
            ..ConfigFile::default()
        };

        let merged = ConfigFile::default().layered_over(&defaults);
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_empty_string_wins_over_default() {
        let layer = ConfigFile {
            base_dockerfile: some(""),
            ..ConfigFile::default()
        };
        let defaults = ConfigFile {
            base_dockerfile: some("Deepo-py37-cu10"),
            ..ConfigFile::default()
        };

        assert_eq!(layer.layered_over(&defaults).base_dockerfile, some(""));
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let layer = ConfigFile {
            hostname: some("box"),
            ..ConfigFile::default()
        };
        let defaults = ConfigFile {
            runtime: some("docker"),
            ..ConfigFile::default()
        };
        let (layer_before, defaults_before) = (layer.clone(), defaults.clone());

        let _ = layer.layered_over(&defaults);
        assert_eq!(layer, layer_before);
        assert_eq!(defaults, defaults_before);
    }

    #[test]
    fn test_aliases_merge_per_key() {
        let mut layer = ConfigFile::default();
        layer.user_aliases.insert("bob".to_string(), "b".to_string());
        let mut defaults = ConfigFile::default();
        defaults.user_aliases.insert("bob".to_string(), "robert".to_string());
        defaults.user_aliases.insert("alice".to_string(), "al".to_string());

        let merged = layer.layered_over(&defaults);
        assert_eq!(merged.user_aliases.get("bob").map(String::as_str), Some("b"));
        assert_eq!(merged.user_aliases.get("alice").map(String::as_str), Some("al"));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str("IMAGE_PREFIX = \"dld\"");
        assert!(result.is_err());
    }
}
