//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::resolve::resolve;
use super::types::{Config, ConfigFile};
use crate::error::{DldError, Result};

/// Name of the fallback layer; never selectable on its own
pub const DEFAULTS_NAME: &str = "defaults";
pub const CONFIG_EXTENSION: &str = "toml";

/// A directory of `<name>.toml` configuration files
#[derive(Debug, Clone)]
pub struct ConfigDir {
    path: PathBuf,
}

impl ConfigDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of every selectable configuration, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |e| e != CONFIG_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem != DEFAULTS_NAME {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load the named layer without merging defaults.
    ///
    /// Only names returned by [`ConfigDir::list`] are accepted.
    pub fn load_layer(&self, name: &str) -> Result<ConfigFile> {
        let available = self.list().unwrap_or_default();
        if !available.iter().any(|n| n == name) {
            return Err(DldError::ConfigNotFound {
                name: name.to_string(),
                available,
            });
        }
        read_layer(&self.file_path(name))
    }

    /// Load `defaults.toml`, or an empty layer when it does not exist
    pub fn load_defaults(&self) -> Result<ConfigFile> {
        let path = self.file_path(DEFAULTS_NAME);
        if !path.is_file() {
            debug!("no defaults at {}, using an empty layer", path.display());
            return Ok(ConfigFile::default());
        }
        read_layer(&path)
    }

    /// Load and resolve the named configuration for `user`
    pub fn load(&self, name: &str, user: &str) -> Result<Config> {
        let layer = self.load_layer(name)?;
        let defaults = self.load_defaults()?;
        resolve(&layer, &defaults, name, user)
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.{}", name, CONFIG_EXTENSION))
    }
}

fn read_layer(path: &Path) -> Result<ConfigFile> {
    debug!("reading configuration layer {}", path.display());
    let contents = fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| DldError::ConfigParse {
        path: path.display().to_string(),
        source,
    })
}
