use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::QueryKey;

/// Whether a new reader triggers a fetch when a cached value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefetchOnMount {
    /// Always fetch; the cached value is only used while the fetch runs.
    Always,
    /// Fetch only when the cached value is older than `stale_time`.
    #[default]
    IfStale,
    /// Serve any cached value, however old. Invalidated values are still
    /// refetched.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// `false` keeps the fetcher from running. Cached data is still served.
    pub enabled: bool,
    /// Age below which a cached value is served without a fetch.
    pub stale_time: Duration,
    pub refetch_on_mount: RefetchOnMount,
    /// Background revalidation cadence for this key.
    pub refetch_interval: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time: Duration::ZERO,
            refetch_on_mount: RefetchOnMount::IfStale,
            refetch_interval: None,
        }
    }
}

impl QueryOptions {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn refetch_on_mount(mut self, refetch_on_mount: RefetchOnMount) -> Self {
        self.refetch_on_mount = refetch_on_mount;
        self
    }

    pub fn refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = Some(interval);
        self
    }
}

type KeysFn<V, R, C> = Box<dyn Fn(&R, &V, Option<&C>) -> Vec<QueryKey> + Send + Sync>;

/// Declarative side effects of a mutation on the query cache.
///
/// `invalidate_queries` and `remove_queries` are only evaluated after the
/// mutator succeeded.
pub struct MutationOptions<V, R, C = ()> {
    pub(crate) label: &'static str,
    pub(crate) on_mutate: Option<Box<dyn Fn(&V) -> C + Send + Sync>>,
    pub(crate) invalidate_queries: KeysFn<V, R, C>,
    pub(crate) remove_queries: Option<KeysFn<V, R, C>>,
}

impl<V, R> MutationOptions<V, R, ()> {
    /// Invalidates the prefixes returned by `keys` on success.
    pub fn invalidating<F>(label: &'static str, keys: F) -> Self
    where
        F: Fn(&R, &V) -> Vec<QueryKey> + Send + Sync + 'static,
    {
        Self {
            label,
            on_mutate: None,
            invalidate_queries: Box::new(move |result, vars, _| keys(result, vars)),
            remove_queries: None,
        }
    }

    /// Drops the entries under the prefixes returned by `keys` on success.
    pub fn removing<F>(mut self, keys: F) -> Self
    where
        F: Fn(&R, &V) -> Vec<QueryKey> + Send + Sync + 'static,
    {
        self.remove_queries = Some(Box::new(move |result, vars, _| keys(result, vars)));
        self
    }
}

impl<V, R, C> MutationOptions<V, R, C> {
    /// Full form: `on_mutate` runs before the mutator and its value is handed
    /// to `invalidate` as context.
    pub fn with_context<M, F>(label: &'static str, on_mutate: M, invalidate: F) -> Self
    where
        M: Fn(&V) -> C + Send + Sync + 'static,
        F: Fn(&R, &V, Option<&C>) -> Vec<QueryKey> + Send + Sync + 'static,
    {
        Self {
            label,
            on_mutate: Some(Box::new(on_mutate)),
            invalidate_queries: Box::new(invalidate),
            remove_queries: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}
