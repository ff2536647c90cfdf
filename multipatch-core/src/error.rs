//! Error types for multipatch

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for multipatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for multipatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// The tracking manifest is required but does not exist
    #[error("no such file: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The repository is not in a state where provisioning can start
    #[error("repository state error: {0}")]
    RepositoryState(String),

    /// Error from the underlying git library
    #[error("git error: {}", .0.message())]
    Git(#[from] git2::Error),

    /// The tracking manifest exists but could not be parsed
    #[error("invalid manifest {}: {error}", path.display())]
    Manifest {
        path: PathBuf,
        error: serde_yaml::Error,
    },

    /// User configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
