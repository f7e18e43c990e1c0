//! Action dispatch

pub mod commands;
pub mod executor;
pub mod update_path;

pub use commands::BuildOptions;
pub use executor::{Dispatcher, ExecutionContext, InfoReport, MountOptions};
pub use update_path::update_path;
