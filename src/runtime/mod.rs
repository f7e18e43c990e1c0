//! Container runtime plumbing
//!
//! Everything here talks to `docker`/`nvidia-docker` through argument
//! vectors; nothing is passed through a shell.

pub mod invocation;
pub mod ports;
pub mod runner;

pub use invocation::Invocation;
pub use ports::{auto_port_mappings, conflicting_ports, list_published, parse_taken_ports};
pub use runner::{Runner, SystemRunner};
