//! Error types for the command line and MCP server

use platform_context_core::{ApiError, CatalogError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catalog source error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Search or lookup error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed MCP traffic
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type alias using the CLI error.
pub type Result<T> = std::result::Result<T, Error>;
