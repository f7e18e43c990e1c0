//! Named configurations
//!
//! Each configuration is a TOML file in the `configs/` directory. Keys missing
//! from it are taken from `defaults.toml`, and whatever is still unset is
//! derived (image tags, container name) or filled with a literal fallback.

mod loader;
mod resolve;
mod types;

pub use loader::{ConfigDir, CONFIG_EXTENSION, DEFAULTS_NAME};
pub use resolve::{image_name, resolve};
pub use types::{Config, ConfigFile};
