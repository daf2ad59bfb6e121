//! Error types for Domainly

use thiserror::Error;

/// Result type for Domainly operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Domainly
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// A domain with this name already exists
    #[error("Domain '{0}' already exists")]
    Duplicate(String),

    /// Domain not found
    #[error("Domain with id {0} not found")]
    NotFound(i64),

    /// Hosts file error
    #[error("Hosts file error: {0}")]
    Hosts(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Permission(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
