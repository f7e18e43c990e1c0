//! Output formatting module

pub mod formatter;
pub mod human;
pub mod json;
pub mod progress;

pub use formatter::{format_output, OutputFormat};
pub use progress::{log_line, timestamped};
