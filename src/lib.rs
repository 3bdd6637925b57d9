//! Rust Settlement Engine Library
//! # Overview
//!
//! This library reduces a group's shared expenses to a short list of
//! point-to-point payments ("who pays whom, how much"), with both a sync and
//! an async CSV processing strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Participant, Expense, Balance, Transaction, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Per-participant balance accrual
//!   - [`core::engine`] - Classification, sorting and greedy matching
//!   - [`core::split`] - Equal / exact split allocation and expense validation
//!   - [`core::async`](crate::core::r#async) - Concurrent accrual
//! - [`io`] - CSV input parsing and report output
//! - [`strategy`] - Pluggable sync / async processing pipelines
//!
//! # Algorithm
//!
//! 1. Every expense credits its payer with the full amount and debits each
//!    share from its participant
//! 2. Balances beyond the tolerance become debtors (negative) or creditors
//!    (positive)
//! 3. Debtors are sorted most-negative first, creditors most-positive first
//! 4. A two-pointer sweep pays `min(|debt|, credit)` from the current debtor
//!    to the current creditor, rounded to the minor currency unit
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use rust_settlement_engine::{equal_split, Expense, Participant, SettlementEngine};
//!
//! let participants = vec![
//!     Participant::new("a", "Alice"),
//!     Participant::new("b", "Bob"),
//!     Participant::new("c", "Carol"),
//! ];
//! let ids: Vec<String> = participants.iter().map(|p| p.id.clone()).collect();
//! let shares = equal_split(Decimal::from(300), &ids).unwrap();
//! let expenses = vec![Expense::new("a", Decimal::from(300), shares)];
//!
//! let plan = SettlementEngine::default().compute_settlements(&participants, &expenses);
//! assert_eq!(plan.len(), 2);
//! assert!(plan.iter().all(|t| t.to == "a" && t.amount == Decimal::from(100)));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    equal_split, exact_split, Allocation, BalanceLedger, BalanceSheet, EngineConfig,
    ExpenseDraft, RoundingMode, SettlementEngine,
};
pub use io::{write_settlements_csv, ExpenseReader};
pub use types::{
    Balance, Expense, ExpenseShare, Participant, ParticipantId, SettlementError, SplitType,
    Transaction,
};
