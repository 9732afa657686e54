use thiserror::Error;

use crate::common::{PageError, ResourceId};

/// Failures raised by a [`CatalogStore`](super::store::CatalogStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(ResourceId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::InvalidRow(format!("column {}: {}", index, source))
            }
            other => StoreError::Database(other),
        }
    }
}

/// Errors returned by search.
///
/// `InvalidFilter` is caller-correctable and names the offending field.
/// `StorageUnavailable` wraps the store failure unchanged; search never turns
/// a failed read into an empty page.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid filter `{field}`: {message}")]
    InvalidFilter { field: &'static str, message: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

impl SearchError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        SearchError::InvalidFilter {
            field,
            message: message.into(),
        }
    }

    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, SearchError::InvalidFilter { .. })
    }
}

impl From<PageError> for SearchError {
    fn from(error: PageError) -> Self {
        let field = match error {
            PageError::PageOutOfRange => "page",
            PageError::PageSizeOutOfRange { .. } => "pageSize",
        };
        SearchError::invalid(field, error.to_string())
    }
}
