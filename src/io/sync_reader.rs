//! Synchronous CSV readers for participants and expenses
//!
//! Provides a streaming iterator over expense rows and a loader for the
//! participants file. Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! ExpenseReader implements the Iterator trait, yielding
//! `Result<Expense, SettlementError>` for each CSV row:
//!
//! ```no_run
//! use rust_settlement_engine::io::sync_reader::ExpenseReader;
//! use rust_decimal::Decimal;
//! use std::path::Path;
//!
//! let reader = ExpenseReader::new(Path::new("expenses.csv"), Decimal::ONE).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(expense) => println!("Accruing expense paid by {}", expense.payer),
//!         Err(e) => eprintln!("Skipping row: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()` and
//!   `read_participants()`
//! - Individual expense row errors are yielded as Err variants carrying the
//!   line number, so callers can skip the row and continue
//! - The participants file is small and fully validated: any bad row is fatal

use crate::io::csv_format::{
    convert_expense_record, convert_participant_record, ExpenseRecord, ParticipantRecord,
};
use crate::types::{Expense, Participant, SettlementError};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;

fn open(path: &Path) -> Result<csv::Reader<File>, SettlementError> {
    let file = File::open(path).map_err(|e| SettlementError::open_failed(path, e))?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Load every participant from a CSV file with columns `id,name`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row is invalid.
pub fn read_participants(path: &Path) -> Result<Vec<Participant>, SettlementError> {
    let mut reader = open(path)?;
    let mut participants = Vec::new();

    for (index, result) in reader.deserialize::<ParticipantRecord>().enumerate() {
        // Line 1 is the header
        let line = index as u64 + 2;
        let participant = result
            .map_err(SettlementError::from)
            .and_then(convert_participant_record)
            .map_err(|e| SettlementError::at_line(line, e))?;
        participants.push(participant);
    }

    Ok(participants)
}

/// Streaming reader over expense rows
///
/// Maintains constant memory usage: one CSV record is held at a time.
#[derive(Debug)]
pub struct ExpenseReader {
    reader: csv::Reader<File>,
    tolerance: Decimal,
    line_num: u64,
}

impl ExpenseReader {
    /// Open an expenses CSV file for streaming
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    /// * `tolerance` - Accepted exact-split mismatch, passed to row validation
    ///
    /// # Returns
    ///
    /// * `Ok(ExpenseReader)` if the file opened successfully
    /// * `Err(SettlementError)` if the file could not be opened
    pub fn new(path: &Path, tolerance: Decimal) -> Result<Self, SettlementError> {
        Ok(Self {
            reader: open(path)?,
            tolerance,
            line_num: 1,
        })
    }
}

impl Iterator for ExpenseReader {
    type Item = Result<Expense, SettlementError>;

    /// Read, convert and validate the next expense row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(Expense))` - Successfully parsed expense
    /// * `Some(Err(SettlementError))` - ParseError with the row's line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let result = self.reader.deserialize::<ExpenseRecord>().next()?;
        self.line_num += 1;

        let tolerance = self.tolerance;
        let line = self.line_num;
        Some(
            result
                .map_err(SettlementError::from)
                .and_then(|record| convert_expense_record(record, tolerance))
                .map_err(|e| SettlementError::at_line(line, e)),
        )
    }
}
