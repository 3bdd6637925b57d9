//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `read_participants` and `ExpenseReader` (iterator interface)
//! - Accrual to `BalanceLedger`
//! - Settlement to `SettlementEngine`
//! - Report output to the `csv_format` writers
//!
//! # Memory Efficiency
//!
//! Expense rows are streamed one at a time; memory usage is
//! O(participants), not O(expenses).

use super::{write_report, Inputs, OutputOptions, ProcessingStrategy};
use crate::core::{BalanceLedger, BalanceSheet, SettlementEngine};
use crate::io::sync_reader::{read_participants, ExpenseReader};
use crate::types::SettlementError;
use std::io::Write;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_settlement_engine::core::SettlementEngine;
/// use rust_settlement_engine::strategy::{
///     Inputs, OutputOptions, ProcessingStrategy, SyncProcessingStrategy,
/// };
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(SettlementEngine::default(), OutputOptions::default());
/// let mut output = io::stdout();
///
/// strategy
///     .process(&Inputs::new("participants.csv", "expenses.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    engine: SettlementEngine,
    output: OutputOptions,
}

impl SyncProcessingStrategy {
    pub fn new(engine: SettlementEngine, output: OutputOptions) -> Self {
        Self { engine, output }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Run the complete synchronous pipeline
    ///
    /// 1. Loads all participants
    /// 2. Streams expense rows into a BalanceLedger, skipping invalid rows
    /// 3. Settles the balances and writes the report
    fn process(&self, inputs: &Inputs, output: &mut dyn Write) -> Result<(), SettlementError> {
        let participants = read_participants(&inputs.participants)?;
        let mut ledger = BalanceLedger::new(&participants);

        let reader = ExpenseReader::new(&inputs.expenses, self.engine.config().tolerance)?;

        let mut accrued = 0usize;
        let mut skipped = 0usize;
        for result in reader {
            match result {
                Ok(expense) => {
                    ledger.accrue(&expense);
                    accrued += 1;
                }
                Err(e) => {
                    warn!("skipping expense row: {}", e);
                    skipped += 1;
                }
            }
        }

        info!(
            participants = participants.len(),
            accrued, skipped, "expenses accrued"
        );

        write_report(&self.engine, &self.output, &participants, ledger.balances(), output)
    }
}
