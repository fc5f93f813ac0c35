//! Keyed read cache with single-flight fetching and declarative invalidation.

pub mod client;
pub mod key;
pub mod options;
pub mod state;

pub use client::{CacheConfig, QueryClient, Revalidate};
pub use key::QueryKey;
pub use options::{MutationOptions, QueryOptions, RefetchOnMount};
pub use state::{CacheSnapshotEntry, QueryState, QueryStatus};

use thiserror::Error;

use crate::{http::HttpError, model::validation::ValidationErrors};

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again";

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{operation} returned no data")]
    Unsuccessful { operation: &'static str },
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("cached value for {key} has a different type")]
    TypeMismatch { key: String },
    #[error("fetch aborted: {0}")]
    Aborted(String),
}

impl QueryError {
    /// Text for a toast: the backend's message when it sent one, otherwise a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Http(e) => e
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            QueryError::Validation(errors) => errors.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
