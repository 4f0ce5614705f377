//! Capped-collection lifecycle: provision once, then stream records forever.

use crate::document::CappedRecord;
use crate::memory::{MemoryCollection, MemoryStore};
use crate::store::{CollectionOptions, DocumentStore, StoreError};
use seqflow::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Error types for the feed lifecycle
#[derive(Debug, Error)]
pub enum FeedError {
    /// A store operation failed
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
    /// The feed task could not be joined on shutdown
    #[error("feed task join error: {0}")]
    Join(String),
}

/// Configuration for the capped feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Name of the capped collection
    pub collection: String,
    /// Time between two synthesized records
    pub tick_period: Duration,
    /// Maximum storage size of the capped collection in bytes
    pub max_bytes: usize,
    /// Maximum document count; the effective eviction trigger
    pub max_docs: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            collection: "item_capped".to_string(),
            tick_period: Duration::from_secs(1),
            max_bytes: 50_000,
            max_docs: 20,
        }
    }
}

impl FeedConfig {
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection = name.into();
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn with_caps(mut self, max_bytes: usize, max_docs: usize) -> Self {
        self.max_bytes = max_bytes;
        self.max_docs = max_docs;
        self
    }
}

/// Thread-safe counters for the feed task (uses atomics)
#[derive(Debug, Default)]
pub struct FeedMetrics {
    records_inserted: AtomicU64,
    insert_failures: AtomicU64,
}

impl FeedMetrics {
    pub fn records_inserted(&self) -> u64 {
        self.records_inserted.load(Ordering::Relaxed)
    }

    pub fn insert_failures(&self) -> u64 {
        self.insert_failures.load(Ordering::Relaxed)
    }

    fn record_insert(&self) {
        self.records_inserted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.insert_failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owns the capped collection's lifecycle.
///
/// Provisioning runs once at process start and destroys any prior records.
/// Streaming then inserts one synthesized record per tick for the lifetime
/// of the process; the feed holds the task and shutdown handles so no timer
/// survives teardown.
pub struct CappedFeed {
    task: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    metrics: Arc<FeedMetrics>,
}

impl CappedFeed {
    /// Drops and recreates the capped collection.
    ///
    /// Any existing records are lost. A provisioning failure is fatal to
    /// this component: the error propagates and the feed must not be
    /// started without a freshly provisioned collection.
    pub async fn provision(
        store: &MemoryStore,
        config: &FeedConfig,
    ) -> Result<MemoryCollection<CappedRecord>, FeedError> {
        store.drop_collection(&config.collection).await?;
        store
            .create_collection(
                &config.collection,
                CollectionOptions::capped(config.max_bytes, config.max_docs),
            )
            .await?;
        Ok(store.collection(&config.collection))
    }

    /// Starts the producer task over a provisioned collection.
    ///
    /// On each tick `i` the task synthesizes `Random Item i` valued
    /// `100.0 + i` and inserts it. Insert failures are logged and counted
    /// but do not stop the stream: each tick's insertion is independent.
    pub fn start<S>(collection: S, config: FeedConfig) -> Self
    where
        S: DocumentStore<CappedRecord> + 'static,
    {
        let metrics = Arc::new(FeedMetrics::default());
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task_metrics = Arc::clone(&metrics);
        let task = tokio::spawn(async move {
            let mut ticks = seqflow::interval(config.tick_period);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    Some(seq) = ticks.next() => {
                        match collection.save(CappedRecord::synthesize(seq)).await {
                            Ok(record) => {
                                task_metrics.record_insert();
                                tracing::debug!(label = %record.label, "inserted capped record");
                            }
                            Err(err) => {
                                task_metrics.record_failure();
                                tracing::warn!(seq, %err, "capped insert failed, continuing");
                            }
                        }
                    }
                }
            }
        });

        Self {
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
            metrics,
        }
    }

    /// Returns the feed counters.
    pub fn metrics(&self) -> &Arc<FeedMetrics> {
        &self.metrics
    }

    /// Gracefully stops the producer.
    ///
    /// The loop ends, the timer is released, and the task is joined - no
    /// orphaned timers after shutdown.
    pub async fn shutdown(mut self) -> Result<(), FeedError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.map_err(|e| FeedError::Join(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for CappedFeed {
    fn drop(&mut self) {
        // A dropped handle aborts the producer outright.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_core::Stream;

    async fn all_records(collection: &MemoryCollection<CappedRecord>) -> Vec<CappedRecord> {
        let seq = collection.find_all();
        tokio::pin!(seq);
        let mut records = Vec::new();
        while let Some(record) = seq.next().await {
            records.push(record.expect("decode"));
        }
        records
    }

    #[tokio::test]
    async fn test_provision_destroys_prior_records() {
        let store = MemoryStore::new();
        let config = FeedConfig::default();

        let collection = CappedFeed::provision(&store, &config)
            .await
            .expect("first provision");
        collection
            .save(CappedRecord::synthesize(0))
            .await
            .expect("save");

        let collection = CappedFeed::provision(&store, &config)
            .await
            .expect("second provision");
        assert_eq!(collection.count().await.expect("count"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_never_exceeds_cap() {
        let store = MemoryStore::new();
        let config = FeedConfig::default();
        let collection = CappedFeed::provision(&store, &config)
            .await
            .expect("provision");

        let feed = CappedFeed::start(collection.clone(), config.clone());

        // Run well past the cap of 20.
        tokio::time::sleep(Duration::from_secs(30)).await;

        let inserted = feed.metrics().records_inserted();
        assert!(inserted >= 21, "expected at least 21 ticks, got {inserted}");
        let count = collection.count().await.expect("count");
        assert!(count <= config.max_docs);

        // The oldest surviving record is within the ring's window.
        let records = all_records(&collection).await;
        let oldest = records[0].sequence().expect("sequence label");
        assert!(oldest >= inserted - config.max_docs as u64);

        feed.shutdown().await.expect("shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_failures_do_not_stop_the_stream() {
        struct FlakyStore {
            inner: MemoryCollection<CappedRecord>,
            calls: AtomicU64,
        }

        impl DocumentStore<CappedRecord> for FlakyStore {
            fn find_all(
                &self,
            ) -> impl Stream<Item = Result<CappedRecord, StoreError>> + Send {
                self.inner.find_all()
            }

            async fn find_by_id(&self, id: &str) -> Result<Option<CappedRecord>, StoreError> {
                self.inner.find_by_id(id).await
            }

            async fn find_by_field(
                &self,
                field: &str,
                value: &str,
            ) -> Result<Option<CappedRecord>, StoreError> {
                self.inner.find_by_field(field, value).await
            }

            async fn save(&self, doc: CappedRecord) -> Result<CappedRecord, StoreError> {
                if self.calls.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
                    Err(StoreError::Unavailable("injected failure".to_string()))
                } else {
                    self.inner.save(doc).await
                }
            }

            async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
                self.inner.delete_by_id(id).await
            }

            async fn delete_all(&self) -> Result<(), StoreError> {
                self.inner.delete_all().await
            }
        }

        let store = MemoryStore::new();
        let config = FeedConfig::default();
        let collection = CappedFeed::provision(&store, &config)
            .await
            .expect("provision");
        let flaky = FlakyStore {
            inner: collection.clone(),
            calls: AtomicU64::new(0),
        };

        let feed = CappedFeed::start(flaky, config);

        tokio::time::sleep(Duration::from_secs(10)).await;

        // Every other insert failed, yet the stream kept going: both
        // counters advanced and the surviving records are the even ticks'
        // successors.
        assert!(feed.metrics().insert_failures() >= 4);
        assert!(feed.metrics().records_inserted() >= 4);
        assert!(collection.count().await.expect("count") >= 4);

        feed.shutdown().await.expect("shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_joins_the_task() {
        let store = MemoryStore::new();
        let config = FeedConfig::default();
        let collection = CappedFeed::provision(&store, &config)
            .await
            .expect("provision");

        let feed = CappedFeed::start(collection.clone(), config);
        tokio::time::sleep(Duration::from_secs(3)).await;
        feed.shutdown().await.expect("shutdown");

        // No producer survives shutdown: the count is frozen.
        let count = collection.count().await.expect("count");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(collection.count().await.expect("count"), count);
    }
}
