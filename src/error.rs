//! Error types for configuration loading.
//!
//! The simulation itself never fails; only reading a balance file can.

/// Error type for configuration operations
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values that parse but cannot drive a session
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
