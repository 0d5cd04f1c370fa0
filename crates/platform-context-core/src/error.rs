//! Error types for catalog loading and API operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a catalog source while producing its element sequences.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a valid dump
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Source cannot produce data at all
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog sources
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors returned by the API facade.
///
/// The not-found family (`NotFound`, `TypeNotFound`, `MemberNotFound`,
/// `NoConstructors`) describes expected outcomes of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("name must not be empty")]
    EmptyName,

    /// The last index build failed; cleared by `reload()`
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("element not found: {name} (kind: {})", kind_label(.kind))]
    NotFound {
        name: String,
        kind: Option<String>,
    },

    #[error("type not found: {0}")]
    TypeNotFound(String),

    #[error("member not found: {member_name} in type {type_name}")]
    MemberNotFound {
        type_name: String,
        member_name: String,
    },

    #[error("no constructors for type {0}")]
    NoConstructors(String),
}

impl ApiError {
    /// True for the expected not-found outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound { .. }
                | ApiError::TypeNotFound(_)
                | ApiError::MemberNotFound { .. }
                | ApiError::NoConstructors(_)
        )
    }
}

fn kind_label(kind: &Option<String>) -> &str {
    kind.as_deref().unwrap_or("any")
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
