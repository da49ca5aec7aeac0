//! Batch executor.

use super::ledger::BatchLedger;
use crate::Result;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

#[derive(Debug, Clone)]
pub struct BatchExecutorConfig {
    /// Upper bound on items in flight at any moment.
    pub max_concurrency: usize,
}
impl Default for BatchExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
impl BatchExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }
}

pub struct BatchExecutor {
    config: BatchExecutorConfig,
}
impl BatchExecutor {
    pub fn new() -> Self {
        Self {
            config: BatchExecutorConfig::default(),
        }
    }
    pub fn with_config(config: BatchExecutorConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &BatchExecutorConfig {
        &self.config
    }

    /// Run `executor_fn` over every item with bounded concurrency.
    ///
    /// Every outcome lands in the ledger under the item's input index, and `on_complete`
    /// is called exactly once per item while the ledger lock is held, so callbacks never
    /// run concurrently with each other.
    pub async fn execute_concurrent<T, R, F, Fut, C>(
        &self,
        items: Vec<T>,
        executor_fn: F,
        on_complete: Option<C>,
    ) -> BatchLedger<R>
    where
        F: Fn(usize, &T) -> Fut,
        Fut: Future<Output = Result<R>>,
        C: Fn(usize, &T, &Result<R>),
    {
        let start = Instant::now();
        let total = items.len();
        let limit = self.config.max_concurrency.max(1);
        let ledger = Mutex::new(BatchLedger::new());

        let ledger_ref = &ledger;
        let executor_ref = &executor_fn;
        let callback_ref = on_complete.as_ref();
        stream::iter(items.iter().enumerate())
            .map(move |(i, item)| async move {
                let outcome = executor_ref(i, item).await;
                let mut guard = ledger_ref.lock().await;
                let recorded = guard.record(i, outcome);
                if let Some(cb) = callback_ref {
                    cb(i, item, recorded);
                }
                debug!(index = i, ok = recorded.is_ok(), "batch item finished");
            })
            .buffer_unordered(limit)
            .collect::<Vec<()>>()
            .await;

        let ledger = ledger.into_inner();
        info!(
            total,
            succeeded = ledger.success_count(),
            failed = ledger.failure_count(),
            max_concurrency = limit,
            duration_ms = start.elapsed().as_millis() as u64,
            "batch finished"
        );
        ledger
    }
}
impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}
