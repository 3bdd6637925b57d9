//! Processing strategy module for settlement pipelines
//!
//! This module defines the Strategy pattern for complete settlement pipelines,
//! encompassing CSV parsing, balance accrual, settlement and report output.
//! This allows different accrual implementations (synchronous, concurrent
//! batches) to be selected at runtime while producing identical reports.

use crate::cli::{OutputFormat, ReportKind, StrategyType};
use crate::core::{EngineConfig, SettlementEngine};
use crate::io::csv_format::{
    participant_names, write_balances_csv, write_balances_text, write_settlements_csv,
    write_settlements_text,
};
use crate::types::{Balance, Participant, SettlementError};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Input files for one settlement run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    /// CSV file with columns `id,name`
    pub participants: PathBuf,

    /// CSV file with columns `expense,title,payer,amount,split,shares`
    pub expenses: PathBuf,
}

impl Inputs {
    pub fn new(participants: impl Into<PathBuf>, expenses: impl Into<PathBuf>) -> Self {
        Inputs {
            participants: participants.into(),
            expenses: expenses.into(),
        }
    }
}

/// What report to write and how to format it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub report: ReportKind,

    /// Symbol prefixed to amounts in text settlement output
    pub currency: String,
}

/// Processing strategy trait for complete settlement pipelines
///
/// Each strategy reads the participants and expenses files, accrues
/// balances, and writes the requested report to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process the input files and write the report to output
    ///
    /// # Arguments
    ///
    /// * `inputs` - Participants and expenses file paths
    /// * `output` - Mutable reference to a writer for the report
    ///
    /// # Returns
    ///
    /// * `Ok(())` if processing completed (possibly skipping invalid expense rows)
    /// * `Err(SettlementError)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either input file cannot be opened
    /// - The participants file contains an invalid row
    /// - Output cannot be written
    /// - The async runtime cannot be created
    ///
    /// Invalid expense rows are logged and skipped; they never cause this
    /// method to return an error.
    fn process(&self, inputs: &Inputs, output: &mut dyn Write) -> Result<(), SettlementError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `batch_config` - Optional configuration for async batch processing (ignored for sync)
/// * `engine_config` - Settlement tolerance, rounding and scale
/// * `output` - Report selection and formatting
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    engine_config: EngineConfig,
    output: OutputOptions,
) -> Box<dyn ProcessingStrategy> {
    let engine = SettlementEngine::new(engine_config);

    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(engine, output)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch_config.unwrap_or_default(),
            engine,
            output,
        )),
    }
}

/// Settle accrued balances (if requested) and write the report
///
/// Shared by every strategy so that all of them produce identical output.
fn write_report(
    engine: &SettlementEngine,
    options: &OutputOptions,
    participants: &[Participant],
    balances: Vec<Balance>,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let names = participant_names(participants);
    let scale = engine.config().scale;

    match options.report {
        ReportKind::Balances => match options.format {
            OutputFormat::Csv => write_balances_csv(&balances, &names, output),
            OutputFormat::Text => write_balances_text(&balances, &names, output),
        },
        ReportKind::Settlements => {
            let transactions = engine.settle(balances);
            info!(payments = transactions.len(), "settlement plan computed");

            match options.format {
                OutputFormat::Csv => write_settlements_csv(&transactions, scale, output),
                OutputFormat::Text => {
                    write_settlements_text(&transactions, &names, &options.currency, scale, output)
                }
            }
        }
    }
}
