//! Stock query layer: keyed cache, in-flight deduplication, staleness and
//! periodic refresh in front of a [`StockGateway`].
//!
//! - One cache entry per inventory item, shared by every caller.
//! - Concurrent queries for the same item share a single gateway call.
//! - A stale entry is still served while a background refetch runs.
//! - Entries nobody reads for `idle_timeout` are dropped.
//! - A `NotFound` answer removes the item's cached copy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use moka::future::Cache;
use moka::ops::compute::Op;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use prodtrack_inventory::{Eligibility, InventoryItemId, StockReading, StockSnapshot, evaluate};

use crate::error::ClientError;
use crate::gateway::StockGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockQueryOptions {
    /// How often a watched item is refetched.
    pub refresh_interval: Duration,
    /// Age after which a cached reading counts as stale.
    pub stale_after: Duration,
    /// Unread entries are evicted after this long.
    pub idle_timeout: Duration,
    pub max_capacity: u64,
}

impl Default for StockQueryOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            stale_after: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// A cached snapshot and when it was obtained.
#[derive(Debug, Clone)]
pub struct CachedStock {
    snapshot: StockSnapshot,
    requested_at: Instant,
    fetched_at: Instant,
}

impl CachedStock {
    pub fn snapshot(&self) -> &StockSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> StockSnapshot {
        self.snapshot
    }

    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    pub fn is_stale(&self, stale_after: Duration) -> bool {
        self.age() >= stale_after
    }
}

type PendingQuery = Shared<BoxFuture<'static, Result<StockSnapshot, ClientError>>>;

struct InFlight {
    ticket: u64,
    requested_at: Instant,
    query: PendingQuery,
}

struct Inner {
    gateway: Arc<dyn StockGateway>,
    options: StockQueryOptions,
    entries: Cache<InventoryItemId, CachedStock>,
    in_flight: Mutex<HashMap<InventoryItemId, InFlight>>,
    next_ticket: AtomicU64,
}

impl Inner {
    fn in_flight(&self) -> MutexGuard<'_, HashMap<InventoryItemId, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared stock query cache. Clones share the same entries.
#[derive(Clone)]
pub struct StockQueryCache {
    inner: Arc<Inner>,
}

impl StockQueryCache {
    pub fn new(gateway: Arc<dyn StockGateway>, options: StockQueryOptions) -> Self {
        let entries = Cache::builder()
            .max_capacity(options.max_capacity)
            .time_to_idle(options.idle_timeout)
            .build();

        Self {
            inner: Arc::new(Inner {
                gateway,
                options,
                entries,
                in_flight: Mutex::new(HashMap::new()),
                next_ticket: AtomicU64::new(0),
            }),
        }
    }

    pub fn options(&self) -> &StockQueryOptions {
        &self.inner.options
    }

    /// Query the gateway, bypassing any cached value.
    ///
    /// Joins a query already in flight for `id` instead of starting another.
    pub async fn fetch(&self, id: InventoryItemId) -> Result<StockSnapshot, ClientError> {
        let (ticket, requested_at, query) = self.join_or_start(id);
        let result = query.await;

        // Only the first waiter to finish publishes, and only if the query
        // was not superseded by an invalidation.
        if self.take_in_flight(id, ticket) {
            self.publish(id, requested_at, &result).await;
        }
        result
    }

    /// Cached snapshot if one exists, stale or not, without touching the gateway.
    pub async fn cached(&self, id: InventoryItemId) -> Option<CachedStock> {
        self.inner.entries.get(&id).await
    }

    /// True when nothing is cached for `id` or the cached copy is stale.
    pub async fn is_stale(&self, id: InventoryItemId) -> bool {
        match self.cached(id).await {
            Some(entry) => entry.is_stale(self.inner.options.stale_after),
            None => true,
        }
    }

    /// Cached snapshot when present, otherwise a live query.
    ///
    /// A stale entry is returned as-is and a refetch is started in the
    /// background.
    pub async fn get_stock(&self, id: InventoryItemId) -> Result<StockSnapshot, ClientError> {
        if let Some(entry) = self.cached(id).await {
            if entry.is_stale(self.inner.options.stale_after) {
                self.spawn_refetch(id);
            }
            return Ok(entry.into_snapshot());
        }
        self.fetch(id).await
    }

    /// [`Self::get_stock`] folded into a [`StockReading`].
    pub async fn reading(&self, id: InventoryItemId) -> StockReading {
        self.get_stock(id).await.into()
    }

    /// Evaluate `requested` units of `id` against its current reading.
    pub async fn check(&self, id: InventoryItemId, requested: i64) -> Eligibility {
        evaluate(&self.reading(id).await, requested)
    }

    /// Drop the cached copy of `id`. A query already in flight still answers
    /// its callers but no longer updates the cache.
    pub async fn invalidate(&self, id: InventoryItemId) {
        self.inner.in_flight().remove(&id);
        self.inner.entries.invalidate(&id).await;
    }

    /// Watch `id`, refetching every `refresh_interval` while the returned
    /// subscription is alive.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn watch(&self, id: InventoryItemId) -> StockSubscription {
        let (tx, rx) = watch::channel(None);
        let this = self.clone();
        let every = self.inner.options.refresh_interval;

        tokio::spawn(async move {
            tracing::debug!(item_id = %id, "stock refresh started");
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut first = true;

            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = ticker.tick() => {}
                }

                let update = this.refresh(id, first).await;
                first = false;
                if tx.send(Some(update)).is_err() {
                    break;
                }
            }
            tracing::debug!(item_id = %id, "stock refresh stopped");
        });

        StockSubscription {
            item_id: id,
            stale_after: self.inner.options.stale_after,
            rx,
        }
    }

    async fn refresh(&self, id: InventoryItemId, first: bool) -> StockUpdate {
        if first {
            if let Some(entry) = self.cached(id).await {
                if !entry.is_stale(self.inner.options.stale_after) {
                    return StockUpdate {
                        fetched_at: entry.fetched_at(),
                        reading: StockReading::Available(entry.into_snapshot()),
                    };
                }
            }
        }

        let reading = self.fetch(id).await.into();
        StockUpdate {
            reading,
            fetched_at: Instant::now(),
        }
    }

    fn spawn_refetch(&self, id: InventoryItemId) {
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(e) = this.fetch(id).await {
                tracing::debug!(item_id = %id, error = %e, "background stock refetch failed");
            }
        });
    }

    fn join_or_start(&self, id: InventoryItemId) -> (u64, Instant, PendingQuery) {
        let mut in_flight = self.inner.in_flight();
        if let Some(existing) = in_flight.get(&id) {
            tracing::trace!(item_id = %id, "joining in-flight stock query");
            return (existing.ticket, existing.requested_at, existing.query.clone());
        }

        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
        let requested_at = Instant::now();
        let gateway = Arc::clone(&self.inner.gateway);
        let query = async move { gateway.get_stock(id).await }.boxed().shared();

        in_flight.insert(
            id,
            InFlight {
                ticket,
                requested_at,
                query: query.clone(),
            },
        );
        (ticket, requested_at, query)
    }

    fn take_in_flight(&self, id: InventoryItemId, ticket: u64) -> bool {
        let mut in_flight = self.inner.in_flight();
        match in_flight.get(&id) {
            Some(current) if current.ticket == ticket => {
                in_flight.remove(&id);
                true
            }
            _ => false,
        }
    }

    async fn publish(&self, id: InventoryItemId, requested_at: Instant, result: &Result<StockSnapshot, ClientError>) {
        match result {
            Ok(snapshot) => {
                let fresh = CachedStock {
                    snapshot: snapshot.clone(),
                    requested_at,
                    fetched_at: Instant::now(),
                };
                // Never overwrite a reading from a later request.
                self.inner
                    .entries
                    .entry(id)
                    .and_compute_with(|existing| async move {
                        match existing {
                            Some(entry) if entry.value().requested_at > fresh.requested_at => Op::Nop,
                            _ => Op::Put(fresh),
                        }
                    })
                    .await;
            }
            Err(ClientError::NotFound(_)) => {
                tracing::debug!(item_id = %id, "inventory item not found; dropping cached stock");
                self.inner.entries.invalidate(&id).await;
            }
            Err(e) => {
                tracing::warn!(item_id = %id, error = %e, "stock query failed");
            }
        }
    }
}

impl core::fmt::Debug for StockQueryCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StockQueryCache")
            .field("options", &self.inner.options)
            .field("entries", &self.inner.entries.entry_count())
            .finish()
    }
}

/// One refresh result pushed to a subscription.
#[derive(Debug, Clone)]
struct StockUpdate {
    reading: StockReading,
    fetched_at: Instant,
}

/// Live view of one item's stock. Dropping it stops the refresh task.
#[derive(Debug)]
pub struct StockSubscription {
    item_id: InventoryItemId,
    stale_after: Duration,
    rx: watch::Receiver<Option<StockUpdate>>,
}

impl StockSubscription {
    pub fn item_id(&self) -> InventoryItemId {
        self.item_id
    }

    /// Wait for the next reading. `None` once the refresh task has stopped.
    pub async fn changed(&mut self) -> Option<StockReading> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().as_ref().map(|u| u.reading.clone())
    }

    /// Most recent reading, if any has arrived yet.
    pub fn latest(&self) -> Option<StockReading> {
        self.rx.borrow().as_ref().map(|u| u.reading.clone())
    }

    /// True until a reading arrives, and again once it is older than `stale_after`.
    pub fn is_stale(&self) -> bool {
        match self.rx.borrow().as_ref() {
            Some(update) => update.fetched_at.elapsed() >= self.stale_after,
            None => true,
        }
    }

    /// Evaluate `requested` against the latest reading. Before the first
    /// reading arrives availability is unknown.
    pub fn evaluate(&self, requested: i64) -> Eligibility {
        match self.latest() {
            Some(reading) => evaluate(&reading, requested),
            None => evaluate(&StockReading::unknown("no reading yet"), requested),
        }
    }
}
