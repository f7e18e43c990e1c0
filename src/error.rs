//! Error types for dldocker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DldError {
    #[error("Configuration '{name}' not found. Available: {}", .available.join(", "))]
    ConfigNotFound { name: String, available: Vec<String> },

    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing configuration field: {0}")]
    MissingField(&'static str),

    #[error("Following ports are taken: [{}]", .0.join(", "))]
    PortsTaken(Vec<String>),

    #[error("Command `{command}` failed with {status}")]
    CommandFailed { command: String, status: String },

    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_taken_message() {
        let err = DldError::PortsTaken(vec!["9001".to_string(), "9002".to_string()]);
        assert_eq!(err.to_string(), "Following ports are taken: [9001, 9002]");
    }

    #[test]
    fn test_config_not_found_lists_available() {
        let err = DldError::ConfigNotFound {
            name: "tf3x".to_string(),
            available: vec!["tf1x".to_string(), "tf2x".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Configuration 'tf3x' not found. Available: tf1x, tf2x"
        );
    }
}
