use std::{
    any::Any,
    collections::HashMap,
    future::Future,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared, join_all},
};
use moka::future::Cache;
use tracing::{debug, info, warn};

use super::{
    CacheSnapshotEntry, MutationOptions, QueryError, QueryKey, QueryOptions, QueryState,
    QueryStatus, RefetchOnMount,
};

type ErasedValue = Arc<dyn Any + Send + Sync>;
type FetchResult = Result<Option<ErasedValue>, QueryError>;
type ErasedFetch = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_capacity: u64,
    /// Entries nobody has read for this long are evicted.
    pub gc_time: Duration,
    pub defaults: QueryOptions,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            gc_time: Duration::from_secs(300),
            defaults: QueryOptions::default(),
        }
    }
}

/// Which entries [`QueryClient::revalidate`] refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidate {
    /// Entries marked stale by an invalidation or a failed fetch.
    Invalidated,
    /// Invalidated entries plus those whose `refetch_interval` has elapsed.
    Due,
    /// Every entry that knows how to refetch itself.
    All,
}

struct CacheEntry {
    data: Option<ErasedValue>,
    fetched_at: Option<Instant>,
    error: Option<QueryError>,
    invalidated: AtomicBool,
    stale_time: Duration,
    refetch_interval: Option<Duration>,
    fetcher: Option<ErasedFetch>,
    /// Milliseconds since the client epoch of the last `query` that returned
    /// this entry. Background revalidation does not count as a read.
    last_read: AtomicU64,
}

impl CacheEntry {
    fn touch(&self, now_ms: u64) {
        self.last_read.fetch_max(now_ms, Ordering::AcqRel);
    }

    fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Acquire)
    }

    fn has_settled_data(&self) -> bool {
        self.fetched_at.is_some() && self.error.is_none() && !self.is_invalidated()
    }

    fn is_fresh(&self) -> bool {
        self.has_settled_data()
            && self
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.stale_time)
    }

    fn is_due(&self) -> bool {
        match (self.refetch_interval, self.fetched_at) {
            (Some(interval), Some(at)) => at.elapsed() >= interval,
            _ => false,
        }
    }

    fn options(&self) -> QueryOptions {
        QueryOptions {
            stale_time: self.stale_time,
            refetch_interval: self.refetch_interval,
            ..QueryOptions::default()
        }
    }
}

struct InFlight {
    id: u64,
    fetch: SharedFetch,
    /// Set when an invalidation hits the key while this fetch runs; the
    /// result is then stored already stale.
    detached: Arc<AtomicBool>,
}

struct Inner {
    entries: Cache<QueryKey, Arc<CacheEntry>>,
    inflight: Mutex<HashMap<QueryKey, InFlight>>,
    next_flight: AtomicU64,
    defaults: QueryOptions,
    gc_time: Duration,
    epoch: Instant,
}

impl Inner {
    fn inflight(&self) -> MutexGuard<'_, HashMap<QueryKey, InFlight>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Whether a reader has asked for the entry within `gc_time`.
    fn is_observed(&self, entry: &CacheEntry) -> bool {
        let idle = self.now_ms().saturating_sub(entry.last_read.load(Ordering::Acquire));
        u128::from(idle) < self.gc_time.as_millis()
    }

    async fn touch(&self, key: &QueryKey) {
        if let Some(entry) = self.entries.get(key).await {
            entry.touch(self.now_ms());
        }
    }

    /// Detaches matching in-flight fetches, then marks matching entries stale.
    /// Detaching first guarantees a fetch settling concurrently either sees
    /// its detached flag or has already stored an entry that gets marked.
    fn invalidate(&self, prefix: &QueryKey) -> usize {
        {
            let mut inflight = self.inflight();
            inflight.retain(|key, flight| {
                if key.starts_with(prefix) {
                    flight.detached.store(true, Ordering::Release);
                    false
                } else {
                    true
                }
            });
        }

        let mut marked = 0;
        for (key, entry) in self.entries.iter() {
            if key.starts_with(prefix) {
                entry.invalidated.store(true, Ordering::Release);
                marked += 1;
            }
        }
        marked
    }

    async fn settle(
        &self,
        key: QueryKey,
        flight_id: u64,
        detached: &AtomicBool,
        result: &FetchResult,
        fetcher: ErasedFetch,
        options: &QueryOptions,
    ) {
        let previous = self.entries.get(&key).await;
        let last_read = previous
            .as_ref()
            .map_or_else(|| self.now_ms(), |p| p.last_read.load(Ordering::Acquire));

        let entry = match result {
            Ok(data) => CacheEntry {
                data: data.clone(),
                fetched_at: Some(Instant::now()),
                error: None,
                invalidated: AtomicBool::new(detached.load(Ordering::Acquire)),
                stale_time: options.stale_time,
                refetch_interval: options.refetch_interval,
                fetcher: Some(fetcher),
                last_read: AtomicU64::new(last_read),
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Query fetch failed");
                CacheEntry {
                    data: previous.as_ref().and_then(|p| p.data.clone()),
                    fetched_at: previous.as_ref().and_then(|p| p.fetched_at),
                    error: Some(e.clone()),
                    invalidated: AtomicBool::new(true),
                    stale_time: options.stale_time,
                    refetch_interval: options.refetch_interval,
                    fetcher: Some(fetcher),
                    last_read: AtomicU64::new(last_read),
                }
            }
        };

        let entry = Arc::new(entry);
        self.entries.insert(key.clone(), Arc::clone(&entry)).await;

        let mut inflight = self.inflight();
        if detached.load(Ordering::Acquire) {
            debug!(key = %key, "Fetch settled after invalidation, storing as stale");
            entry.invalidated.store(true, Ordering::Release);
        }
        if inflight.get(&key).is_some_and(|f| f.id == flight_id) {
            inflight.remove(&key);
        }
    }
}

/// Process-wide query cache. Cloning shares the cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    pub fn new(config: CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_idle(config.gc_time)
            .build();

        Self {
            inner: Arc::new(Inner {
                entries,
                inflight: Mutex::new(HashMap::new()),
                next_flight: AtomicU64::new(1),
                defaults: config.defaults,
                gc_time: config.gc_time,
                epoch: Instant::now(),
            }),
        }
    }

    /// Options new queries start from.
    pub fn default_options(&self) -> QueryOptions {
        self.inner.defaults.clone()
    }

    /// Cached read.
    ///
    /// Serves the cached value when `options` allow it, otherwise joins the
    /// fetch already running for `key` or starts one. The fetch runs on its
    /// own task, so it completes and populates the cache even if every caller
    /// stops waiting.
    pub async fn query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: &QueryOptions,
        fetcher: F,
    ) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, QueryError>> + Send + 'static,
    {
        let cached = self.inner.entries.get(&key).await;

        if !options.enabled {
            return match cached {
                Some(entry) if entry.fetched_at.is_some() => read(&key, &entry),
                _ => QueryState::Idle,
            };
        }

        if let Some(entry) = &cached {
            let serve = entry.has_settled_data()
                && match options.refetch_on_mount {
                    RefetchOnMount::Always => false,
                    RefetchOnMount::IfStale => entry.is_fresh(),
                    RefetchOnMount::Never => true,
                };
            if serve {
                debug!(key = %key, "Serving cached query");
                entry.touch(self.inner.now_ms());
                return read(&key, entry);
            }
        }

        let fetch = self.join_or_start(key.clone(), erase(fetcher), options);
        let result = fetch.await;
        self.inner.touch(&key).await;
        match result {
            Ok(Some(value)) => downcast(&key, value),
            Ok(None) => QueryState::Empty,
            Err(e) => QueryState::Error(e),
        }
    }

    fn join_or_start(&self, key: QueryKey, fetcher: ErasedFetch, options: &QueryOptions) -> SharedFetch {
        let mut inflight = self.inner.inflight();
        if let Some(flight) = inflight.get(&key) {
            debug!(key = %key, "Joining in-flight fetch");
            return flight.fetch.clone();
        }

        let id = self.inner.next_flight.fetch_add(1, Ordering::Relaxed);
        let detached = Arc::new(AtomicBool::new(false));

        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let task_detached = Arc::clone(&detached);
        let task_options = options.clone();
        debug!(key = %key, flight = id, "Starting fetch");

        let handle = tokio::spawn(async move {
            let result = fetcher().await;
            inner
                .settle(task_key, id, &task_detached, &result, fetcher, &task_options)
                .await;
            result
        });

        let fetch = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(QueryError::Aborted(e.to_string())))
        }
        .boxed()
        .shared();

        inflight.insert(
            key,
            InFlight {
                id,
                fetch: fetch.clone(),
                detached,
            },
        );
        fetch
    }

    /// Runs `mutator`; on success applies the invalidations and removals
    /// declared in `options`. Failures, including a mutator that returned no
    /// data, leave the cache untouched.
    pub async fn mutate<V, R, C, F, Fut>(
        &self,
        variables: V,
        options: MutationOptions<V, R, C>,
        mutator: F,
    ) -> Result<R, QueryError>
    where
        V: Clone,
        F: FnOnce(V) -> Fut,
        Fut: Future<Output = Result<Option<R>, QueryError>>,
    {
        let context = options.on_mutate.as_ref().map(|f| f(&variables));

        let result = match mutator(variables.clone()).await {
            Ok(Some(result)) => result,
            Ok(None) => {
                warn!(mutation = options.label, "Mutation returned no data");
                return Err(QueryError::Unsuccessful {
                    operation: options.label,
                });
            }
            Err(e) => {
                warn!(mutation = options.label, error = %e, "Mutation failed");
                return Err(e);
            }
        };

        if let Some(remove) = &options.remove_queries {
            for prefix in remove(&result, &variables, context.as_ref()) {
                self.remove_queries(&prefix).await;
            }
        }

        let prefixes = (options.invalidate_queries)(&result, &variables, context.as_ref());
        let mut marked = 0;
        for prefix in &prefixes {
            marked += self.invalidate_queries(prefix);
        }
        info!(
            mutation = options.label,
            prefixes = prefixes.len(),
            marked,
            "Mutation succeeded"
        );

        Ok(result)
    }

    /// Marks every entry under `prefix` stale; the next read refetches it.
    /// Returns the number of cached entries marked.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let marked = self.inner.invalidate(prefix);
        debug!(prefix = %prefix, marked, "Invalidated queries");
        marked
    }

    /// Drops every entry under `prefix`.
    pub async fn remove_queries(&self, prefix: &QueryKey) -> usize {
        self.inner.invalidate(prefix);
        let keys: Vec<QueryKey> = self
            .inner
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| QueryKey::clone(&key))
            .collect();

        for key in &keys {
            self.inner.entries.invalidate(key).await;
        }
        debug!(prefix = %prefix, removed = keys.len(), "Removed queries");
        keys.len()
    }

    /// Writes `value` as a fresh result for `key`, keeping the entry's fetch
    /// settings so it can still revalidate.
    pub async fn set_query_data<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let previous = self.inner.entries.get(&key).await;
        let defaults = &self.inner.defaults;
        let entry = CacheEntry {
            data: Some(Arc::new(value)),
            fetched_at: Some(Instant::now()),
            error: None,
            invalidated: AtomicBool::new(false),
            stale_time: previous.as_ref().map_or(defaults.stale_time, |p| p.stale_time),
            refetch_interval: previous
                .as_ref()
                .map_or(defaults.refetch_interval, |p| p.refetch_interval),
            last_read: AtomicU64::new(
                previous
                    .as_ref()
                    .map_or_else(|| self.inner.now_ms(), |p| p.last_read.load(Ordering::Acquire)),
            ),
            fetcher: previous.and_then(|p| p.fetcher.clone()),
        };
        self.inner.entries.insert(key, Arc::new(entry)).await;
    }

    pub async fn get_query_data<T>(&self, key: &QueryKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let entry = self.inner.entries.get(key).await?;
        entry.data.clone()?.downcast::<T>().ok()
    }

    pub async fn status(&self, key: &QueryKey) -> QueryStatus {
        let in_flight = self.inner.inflight().contains_key(key);
        let entry = self.inner.entries.get(key).await;
        status_of(in_flight, entry.as_deref())
    }

    /// Every cached key with its status.
    pub fn snapshot(&self) -> Vec<CacheSnapshotEntry> {
        let inflight = self.inner.inflight();
        let mut entries: Vec<CacheSnapshotEntry> = self
            .inner
            .entries
            .iter()
            .map(|(key, entry)| CacheSnapshotEntry {
                status: status_of(inflight.contains_key(&*key), Some(entry.as_ref())),
                key: QueryKey::clone(&key),
            })
            .collect();
        entries.sort_by_key(|e| e.key.to_string());
        entries
    }

    /// Refetches the entries selected by `scope` in the background of the
    /// caller and waits for them. Returns how many were refetched.
    ///
    /// `Due` only picks entries read within `gc_time`, so entries nobody reads
    /// stop refetching and are left to expire.
    pub async fn revalidate(&self, scope: Revalidate) -> usize {
        let targets: Vec<(QueryKey, Arc<CacheEntry>)> = self
            .inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.fetcher.is_some())
            .filter(|(_, entry)| match scope {
                Revalidate::Invalidated => entry.is_invalidated(),
                Revalidate::Due => {
                    (entry.is_invalidated() || entry.is_due()) && self.inner.is_observed(entry)
                }
                Revalidate::All => true,
            })
            .map(|(key, entry)| (QueryKey::clone(&key), entry))
            .collect();

        let fetches: Vec<SharedFetch> = targets
            .iter()
            .filter_map(|(key, entry)| {
                let fetcher = entry.fetcher.clone()?;
                Some(self.join_or_start(key.clone(), fetcher, &entry.options()))
            })
            .collect();

        let count = fetches.len();
        let failed = join_all(fetches)
            .await
            .into_iter()
            .filter(Result::is_err)
            .count();

        if count > 0 {
            info!(?scope, count, failed, "Revalidated queries");
        }
        count
    }
}

fn erase<T, F, Fut>(fetcher: F) -> ErasedFetch
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<T>, QueryError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetcher();
        async move { fut.await.map(|data| data.map(|v| Arc::new(v) as ErasedValue)) }.boxed()
    })
}

fn read<T: Send + Sync + 'static>(key: &QueryKey, entry: &CacheEntry) -> QueryState<T> {
    match &entry.data {
        Some(value) => downcast(key, Arc::clone(value)),
        None => QueryState::Empty,
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: ErasedValue) -> QueryState<T> {
    match value.downcast::<T>() {
        Ok(v) => QueryState::Success(v),
        Err(_) => QueryState::Error(QueryError::TypeMismatch {
            key: key.to_string(),
        }),
    }
}

fn status_of(in_flight: bool, entry: Option<&CacheEntry>) -> QueryStatus {
    match (in_flight, entry) {
        (true, Some(e)) if e.data.is_some() => QueryStatus::Refetching,
        (true, _) => QueryStatus::Loading,
        (false, None) => QueryStatus::Idle,
        (false, Some(e)) if e.error.is_some() => QueryStatus::Error,
        (false, Some(e)) if e.fetched_at.is_none() => QueryStatus::Idle,
        (false, Some(e)) if e.data.is_none() => QueryStatus::Empty,
        (false, Some(e)) if e.is_fresh() => QueryStatus::Fresh,
        (false, Some(_)) => QueryStatus::Stale,
    }
}
