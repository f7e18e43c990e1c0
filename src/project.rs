//! Project directory layout
//!
//! ```text
//! <root>/configs/*.toml      named configurations + defaults.toml
//! <root>/dockerfiles/<name>  dockerfiles referenced by configurations
//! <root>/dockercontext/      build context for every image
//! ```

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::ConfigDir;
use crate::error::Result;

pub const CONFIGS_DIR: &str = "configs";
pub const DOCKERFILES_DIR: &str = "dockerfiles";
pub const BUILD_CONTEXT_DIR: &str = "dockercontext";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the project root.
    ///
    /// An explicit root wins. Otherwise the directory holding the executable
    /// is used when it has a `configs/` directory, so the tool works from any
    /// working directory once installed next to its configurations. The
    /// current directory is the last resort.
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }

        if let Some(dir) = executable_dir() {
            if dir.join(CONFIGS_DIR).is_dir() {
                debug!("using executable directory {} as project root", dir.display());
                return Ok(Self::new(dir));
            }
        }

        Ok(Self::new(env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn configs(&self) -> ConfigDir {
        ConfigDir::new(self.root.join(CONFIGS_DIR))
    }

    pub fn dockerfile(&self, name: &str) -> PathBuf {
        self.root.join(DOCKERFILES_DIR).join(name)
    }

    pub fn build_context(&self) -> PathBuf {
        self.root.join(BUILD_CONTEXT_DIR)
    }
}

/// Directory containing the running executable, symlinks resolved
pub fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let project = Project::new("/opt/dld");
        assert_eq!(project.configs().path(), Path::new("/opt/dld/configs"));
        assert_eq!(
            project.dockerfile("Lab-tf1x"),
            PathBuf::from("/opt/dld/dockerfiles/Lab-tf1x")
        );
        assert_eq!(project.build_context(), PathBuf::from("/opt/dld/dockercontext"));
    }

    #[test]
    fn test_locate_explicit_root() {
        let dir = TempDir::new().unwrap();
        let project = Project::locate(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn test_executable_dir_exists() {
        assert!(executable_dir().map_or(false, |d| d.is_dir()));
    }
}
