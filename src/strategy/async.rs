//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Expenses are read in batches and each batch is
//! accrued concurrently.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (round-robin chunks on tokio tasks)
//!     │   └── AsyncBalanceLedger (DashMap-backed balances)
//!     └── SettlementEngine (single-threaded settlement)
//! ```
//!
//! # Determinism
//!
//! Accrual is pure addition, so the order in which tasks apply expenses
//! cannot change the final balances. Settlement runs on a snapshot taken
//! in participant input order, so the report is identical to the one the
//! synchronous strategy produces for the same inputs. The exception is
//! arithmetic overflow: a dropped contribution depends on what was
//! accrued before it.

use super::{write_report, Inputs, OutputOptions, ProcessingStrategy};
use crate::core::{AsyncBalanceLedger, BatchProcessor, SettlementEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::sync_reader::read_participants;
use crate::types::SettlementError;
use std::io::Write;
use std::sync::Arc;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, info, warn};

/// Configuration for batch processing
///
/// Controls how expenses are batched and how many tasks accrue each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of expenses per batch
    pub batch_size: usize,
    /// Maximum number of concurrent accrual tasks (and runtime worker threads)
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                fallback = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                max_concurrent,
                fallback = default.max_concurrent,
                "invalid max_concurrent, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Batches are processed one after another; within a batch, expenses are
/// accrued by up to `max_concurrent` tasks in parallel.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    engine: SettlementEngine,
    output: OutputOptions,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and max_concurrent
    /// * `engine` - Engine used to settle the accrued balances
    /// * `output` - Report selection and formatting
    pub fn new(config: BatchConfig, engine: SettlementEngine, output: OutputOptions) -> Self {
        Self {
            config,
            engine,
            output,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Run the complete asynchronous pipeline
    ///
    /// 1. Loads all participants (small file, read synchronously)
    /// 2. Creates a tokio multi-threaded runtime
    /// 3. Reads expenses in batches using AsyncReader
    /// 4. Accrues each batch concurrently and waits before reading the next
    /// 5. Settles the snapshot and writes the report
    fn process(&self, inputs: &Inputs, output: &mut dyn Write) -> Result<(), SettlementError> {
        let participants = read_participants(&inputs.participants)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()
            .map_err(|e| SettlementError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let balances = runtime.block_on(async {
            let ledger = Arc::new(AsyncBalanceLedger::new(&participants));
            let processor = BatchProcessor::new(Arc::clone(&ledger), self.config.max_concurrent);

            let file = tokio::fs::File::open(&inputs.expenses)
                .await
                .map_err(|e| SettlementError::open_failed(&inputs.expenses, e))?;

            // csv-async reads through the futures AsyncRead traits
            let mut reader = AsyncReader::new(file.compat(), self.engine.config().tolerance);

            let mut accrued = 0usize;
            let mut batches = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                accrued += processor.process_batch(batch).await?;
                batches += 1;
                debug!(batches, accrued, "batch complete");
            }

            info!(
                participants = participants.len(),
                accrued,
                skipped = reader.skipped(),
                batches,
                "expenses accrued"
            );

            Ok::<_, SettlementError>(ledger.balances())
        })?;

        write_report(&self.engine, &self.output, &participants, balances, output)
    }
}
