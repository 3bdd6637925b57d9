//! Error types for the Rust Settlement Engine
//!
//! The settlement computation itself is total and never fails. Errors exist
//! only around it: reading inputs and validating expenses before they are
//! handed to the engine.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid data types, etc.
//! - **Expense Validation Errors**: Empty titles, non-positive amounts,
//!   splits that do not add up to the expense total
//! - **Runtime Errors**: Failure to start or join the async runtime

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the settlement engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable for expense rows (the row is skipped), fatal for the
    /// participants file.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Split type is neither `equal` nor `exact`
    #[error("Unknown split type '{split}'")]
    UnknownSplitType {
        /// The unrecognised split string
        split: String,
    },

    /// Amount could not be parsed as a decimal number
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The malformed amount string
        amount: String,
    },

    /// Expense amount is zero or negative
    #[error("Expense amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Expense has no title
    #[error("Expense title must not be empty")]
    EmptyTitle,

    /// Equal split requested with nobody selected
    #[error("Equal split requires at least one selected participant")]
    NoParticipantsSelected,

    /// Exact split entry carries a negative amount
    #[error("Share for participant {participant} is negative: {owed}")]
    NegativeShare {
        /// Participant whose share is negative
        participant: String,
        /// The negative amount
        owed: Decimal,
    },

    /// Exact split lists the same participant more than once
    #[error("Participant {participant} appears more than once in the split")]
    DuplicateShare {
        /// The repeated participant
        participant: String,
    },

    /// Exact split entry is not of the form `id:amount`
    #[error("Malformed share entry '{entry}'")]
    MalformedShare {
        /// The offending entry
        entry: String,
    },

    /// Exact split shares do not sum to the expense total
    #[error("Split shares sum to {actual}, expected {expected}")]
    SplitMismatch {
        /// Expense total
        expected: Decimal,
        /// Sum of the provided shares
        actual: Decimal,
    },

    /// Exact split shares add up to more than a decimal can hold
    #[error("Split shares exceed the supported amount range")]
    SharesOverflow,

    /// Async runtime could not be created or a worker task failed
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },
}

// Conversion from io::Error to SettlementError
impl From<std::io::Error> for SettlementError {
    fn from(error: std::io::Error) -> Self {
        SettlementError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to SettlementError
impl From<csv::Error> for SettlementError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from csv_async::Error to SettlementError
impl From<csv_async::Error> for SettlementError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SettlementError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        SettlementError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Classify a failure to open an input file
    ///
    /// A missing file becomes FileNotFound; anything else is an IoError
    /// naming the path.
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => SettlementError::file_not_found(path),
            _ => SettlementError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        SettlementError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an UnknownSplitType error
    pub fn unknown_split_type(split: &str) -> Self {
        SettlementError::UnknownSplitType {
            split: split.to_string(),
        }
    }

    /// Create a NegativeShare error
    pub fn negative_share(participant: &str, owed: Decimal) -> Self {
        SettlementError::NegativeShare {
            participant: participant.to_string(),
            owed,
        }
    }

    /// Create a DuplicateShare error
    pub fn duplicate_share(participant: &str) -> Self {
        SettlementError::DuplicateShare {
            participant: participant.to_string(),
        }
    }

    /// Create a MalformedShare error
    pub fn malformed_share(entry: &str) -> Self {
        SettlementError::MalformedShare {
            entry: entry.to_string(),
        }
    }

    /// Create a SplitMismatch error
    pub fn split_mismatch(expected: Decimal, actual: Decimal) -> Self {
        SettlementError::SplitMismatch { expected, actual }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl std::fmt::Display) -> Self {
        SettlementError::Runtime {
            message: message.to_string(),
        }
    }

    /// Attach an input line number to a row-level error
    ///
    /// Parse errors keep their message; any other error becomes a
    /// ParseError carrying its display text.
    pub fn at_line(line: u64, error: SettlementError) -> Self {
        let message = match error {
            SettlementError::ParseError { message, .. } => message,
            other => other.to_string(),
        };

        SettlementError::ParseError {
            line: Some(line),
            message,
        }
    }
}
