//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `participant`: Participants and their derived balances
//! - `expense`: Expenses, shares and split policies
//! - `transaction`: Settlement transactions produced by the engine
//! - `error`: Error types for the settlement engine

pub mod error;
pub mod expense;
pub mod participant;
pub mod transaction;

pub use error::SettlementError;
pub use expense::{Expense, ExpenseShare, SplitType};
pub use participant::{Balance, Participant, ParticipantId};
pub use transaction::Transaction;
