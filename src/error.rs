use std::io;
use thiserror::Error;

/// Custom error type for hostscope
#[derive(Error, Debug)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("No packages given")]
    NoPackages,

    #[error("Invalid package name: {0}")]
    InvalidPackage(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hostscope
pub type Result<T> = std::result::Result<T, HostError>;

impl HostError {
    /// Create a command error
    pub fn command<S: Into<String>>(msg: S) -> Self {
        HostError::Command(msg.into())
    }

    pub fn invalid_package<S: Into<String>>(name: S) -> Self {
        HostError::InvalidPackage(name.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        HostError::Other(msg.into())
    }

    /// Short machine-readable code used in JSON error payloads
    pub fn code(&self) -> &'static str {
        match self {
            HostError::NoPackages => "no_packages",
            HostError::InvalidPackage(_) => "invalid_package",
            _ => "internal_error",
        }
    }
}
