use std::io;
use thiserror::Error;

/// Custom error type for the Nimbus support library
#[derive(Error, Debug)]
pub enum CcError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Spawn error: {0}")]
    Spawn(String),

    #[error("Command timed out: {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the Nimbus support library
pub type Result<T> = std::result::Result<T, CcError>;

impl CcError {
    /// Create a path error
    pub fn path<S: Into<String>>(msg: S) -> Self {
        CcError::Path(msg.into())
    }

    /// Create a settings error
    pub fn settings<S: Into<String>>(msg: S) -> Self {
        CcError::Settings(msg.into())
    }

    /// Create a spawn error
    pub fn spawn<S: Into<String>>(msg: S) -> Self {
        CcError::Spawn(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        CcError::Timeout(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CcError::Other(msg.into())
    }
}
