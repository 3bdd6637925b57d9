//! Concurrent batch accrual for async expense processing
//!
//! This module provides the `BatchProcessor` struct, which splits a batch of
//! expenses into chunks and accrues each chunk on its own tokio task.
//!
//! # Design
//!
//! Unlike payment processing, expense accrual has no per-participant ordering
//! requirement: every expense only adds to or subtracts from balances, and
//! addition is commutative. Expenses are therefore dealt round-robin into up
//! to `workers` chunks, without any partitioning key.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AsyncBalanceLedger>  (shared balances)
//!     └── workers                  (maximum chunks per batch)
//! ```

use std::sync::Arc;

use super::AsyncBalanceLedger;
use crate::types::{Expense, SettlementError};
use tracing::debug;

/// Batch processor with round-robin chunking
///
/// Cloneable; clones share the same underlying ledger.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Thread-safe balances shared by all tasks
    ledger: Arc<AsyncBalanceLedger>,

    /// Maximum number of concurrent chunks per batch
    workers: usize,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `ledger` - Arc-wrapped AsyncBalanceLedger to accrue into
    /// * `workers` - Maximum number of concurrent chunks (at least 1)
    pub fn new(ledger: Arc<AsyncBalanceLedger>, workers: usize) -> Self {
        Self {
            ledger,
            workers: workers.max(1),
        }
    }

    /// Deal a batch round-robin into at most `workers` non-empty chunks
    ///
    /// # Guarantees
    ///
    /// - Each expense appears in exactly one chunk
    /// - No expenses are lost or duplicated
    /// - No chunk is empty
    pub fn partition(&self, batch: Vec<Expense>) -> Vec<Vec<Expense>> {
        let chunk_count = self.workers.min(batch.len());
        let mut chunks: Vec<Vec<Expense>> = (0..chunk_count)
            .map(|_| Vec::with_capacity(batch.len() / chunk_count.max(1) + 1))
            .collect();

        for (index, expense) in batch.into_iter().enumerate() {
            chunks[index % chunk_count].push(expense);
        }

        chunks
    }

    /// Accrue a batch of expenses concurrently
    ///
    /// Spawns one tokio task per chunk and waits for all of them.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of expenses accrued
    /// * `Err(SettlementError)` - If a worker task panicked or was cancelled
    pub async fn process_batch(&self, batch: Vec<Expense>) -> Result<usize, SettlementError> {
        let chunks = self.partition(batch);

        let mut tasks = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let ledger = Arc::clone(&self.ledger);
            tasks.push(tokio::spawn(async move {
                for expense in &chunk {
                    ledger.apply_expense(expense);
                }
                chunk.len()
            }));
        }

        let mut applied = 0;
        for task in tasks {
            applied += task
                .await
                .map_err(|e| SettlementError::runtime(format!("accrual task failed: {}", e)))?;
        }

        debug!(applied, "batch accrued");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExpenseShare, Participant};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn ledger() -> Arc<AsyncBalanceLedger> {
        Arc::new(AsyncBalanceLedger::new(&[
            Participant::new("a", "Alice"),
            Participant::new("b", "Bob"),
        ]))
    }

    fn expenses(count: usize) -> Vec<Expense> {
        (0..count)
            .map(|n| {
                Expense::new(
                    "a",
                    Decimal::from(n as i64 + 1),
                    vec![ExpenseShare::new("b", Decimal::from(n as i64 + 1))],
                )
            })
            .collect()
    }

    #[test]
    fn test_zero_workers_treated_as_one() {
        let processor = BatchProcessor::new(ledger(), 0);

        assert_eq!(processor.partition(expenses(3)).len(), 1);
    }

    #[rstest]
    #[case::empty(4, 0, 0)]
    #[case::fewer_expenses_than_workers(4, 2, 2)]
    #[case::more_expenses_than_workers(4, 10, 4)]
    #[case::single_worker(1, 10, 1)]
    fn test_partition_chunk_count(
        #[case] workers: usize,
        #[case] batch: usize,
        #[case] expected_chunks: usize,
    ) {
        let processor = BatchProcessor::new(ledger(), workers);

        let chunks = processor.partition(expenses(batch));

        assert_eq!(chunks.len(), expected_chunks);
        assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
        assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), batch);
    }

    #[test]
    fn test_partition_no_expenses_lost_or_duplicated() {
        let processor = BatchProcessor::new(ledger(), 3);

        let mut amounts: Vec<Decimal> = processor
            .partition(expenses(10))
            .into_iter()
            .flatten()
            .map(|expense| expense.amount)
            .collect();
        amounts.sort();

        let expected: Vec<Decimal> = (1..=10).map(Decimal::from).collect();
        assert_eq!(amounts, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_accrues_everything() {
        let ledger = ledger();
        let processor = BatchProcessor::new(Arc::clone(&ledger), 4);

        let applied = processor.process_batch(expenses(100)).await.unwrap();

        assert_eq!(applied, 100);
        // 1 + 2 + ... + 100
        assert_eq!(ledger.balance("a"), Some(Decimal::from(5050)));
        assert_eq!(ledger.balance("b"), Some(Decimal::from(-5050)));
    }

    #[tokio::test]
    async fn test_process_empty_batch() {
        let processor = BatchProcessor::new(ledger(), 4);

        assert_eq!(processor.process_batch(Vec::new()).await.unwrap(), 0);
    }

    #[test]
    fn test_processor_is_cloneable() {
        let ledger = ledger();
        let processor = BatchProcessor::new(Arc::clone(&ledger), 2);

        let _processor_clone = processor.clone();

        assert!(Arc::strong_count(&ledger) >= 3);
    }
}
