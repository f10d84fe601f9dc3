// Error types for catalog operations

use thiserror::Error;

/// Errors raised by store mutations, predicate setup and loads.
///
/// Every variant is recoverable at the call site. Mutations that fail never
/// touch the store, and a failed load leaves the last good state in place.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("NOT_FOUND: no record '{id}' in {collection}")]
    NotFound { collection: &'static str, id: String },

    #[error("DUPLICATE_ID: record '{id}' already exists in {collection}")]
    DuplicateId { collection: &'static str, id: String },

    #[error("INVALID_FIELD: {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("LOAD_FAILED: {collection}: {source}")]
    LoadFailed {
        collection: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("CONFIG: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a record source while fetching
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
