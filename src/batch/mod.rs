//! # Batch Module
//!
//! Bounded-concurrency execution of independent work items.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchExecutor`] | Runs items with at most `max_concurrency` in flight |
//! | [`BatchExecutorConfig`] | Concurrency bound (default 5) |
//! | [`BatchLedger`] | Outcome of every item, keyed by input position |
//!
//! ## Example
//!
//! ```rust
//! use xai_sdk::batch::{BatchExecutor, BatchExecutorConfig};
//!
//! # tokio_test::block_on(async {
//! let executor = BatchExecutor::with_config(BatchExecutorConfig::new().with_max_concurrency(2));
//! let ledger = executor
//!     .execute_concurrent(
//!         vec![1u32, 2, 3],
//!         |_, n| {
//!             let n = *n;
//!             async move { Ok::<_, xai_sdk::Error>(n * 10) }
//!         },
//!         None::<fn(usize, &u32, &xai_sdk::Result<u32>)>,
//!     )
//!     .await;
//! assert_eq!(ledger.success_count(), 3);
//! # });
//! ```

mod executor;
mod ledger;

pub use executor::{BatchExecutor, BatchExecutorConfig, DEFAULT_MAX_CONCURRENCY};
pub use ledger::BatchLedger;
