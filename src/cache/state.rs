use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::{QueryError, QueryKey};

/// Outcome of a read.
#[derive(Debug)]
pub enum QueryState<T> {
    /// The query is disabled and nothing is cached.
    Idle,
    Success(Arc<T>),
    /// The fetch completed without data.
    Empty,
    Error(QueryError),
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Success(v) => QueryState::Success(Arc::clone(v)),
            QueryState::Empty => QueryState::Empty,
            QueryState::Error(e) => QueryState::Error(e.clone()),
        }
    }
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            QueryState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    /// Collapses to `Ok(None)` for `Idle` and `Empty`.
    pub fn into_result(self) -> Result<Option<Arc<T>>, QueryError> {
        match self {
            QueryState::Success(v) => Ok(Some(v)),
            QueryState::Idle | QueryState::Empty => Ok(None),
            QueryState::Error(e) => Err(e),
        }
    }
}

/// What a cache slot currently holds, as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum QueryStatus {
    Idle,
    /// First fetch in flight.
    Loading,
    /// Fetch in flight with older data still cached.
    Refetching,
    Fresh,
    Stale,
    Empty,
    Error,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CacheSnapshotEntry {
    #[schema(value_type = Vec<Object>, example = json!(["employee", "detail", "emp_01"]))]
    pub key: QueryKey,
    pub status: QueryStatus,
}
