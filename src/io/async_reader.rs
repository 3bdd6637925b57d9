//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over expense rows from a CSV file.
//! Supports batch reading for concurrent accrual.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - the csv_format module for record conversion and validation
//! - tracing to report rows that are skipped
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Expenses
//!                  ↓
//!           csv_format module
//!           (ExpenseRecord, convert_expense_record)
//! ```

use crate::io::csv_format::{convert_expense_record, ExpenseRecord};
use crate::types::{Expense, SettlementError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use rust_decimal::Decimal;
use tracing::warn;

/// Asynchronous expense reader
///
/// Invalid rows are logged at `warn` with their line number and skipped,
/// so a batch only ever contains valid expenses.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    tolerance: Decimal,
    line_num: u64,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    /// * `tolerance` - Accepted exact-split mismatch, passed to row validation
    pub fn new(reader: R, tolerance: Decimal) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            tolerance,
            line_num: 1,
            skipped: 0,
        }
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read a batch of expenses
    ///
    /// Reads rows until `batch_size` valid expenses have been collected or
    /// the input ends.
    ///
    /// # Returns
    ///
    /// A vector of validated expenses. Returns an empty vector when the end
    /// of the input is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Expense> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<ExpenseRecord>();

        while batch.len() < batch_size {
            let Some(result) = records.next().await else {
                break;
            };
            self.line_num += 1;

            let converted = result
                .map_err(SettlementError::from)
                .and_then(|record| convert_expense_record(record, self.tolerance));

            match converted {
                Ok(expense) => batch.push(expense),
                Err(e) => {
                    self.skipped += 1;
                    let error = SettlementError::at_line(self.line_num, e);
                    warn!(line = self.line_num, "skipping expense row: {}", error);
                }
            }
        }

        batch
    }
}
