//! Core business logic module
//!
//! This module contains the settlement components:
//! - `traits` - Trait abstraction over balance accrual
//! - `ledger` - Per-participant balance accrual
//! - `engine` - Classification, sorting and greedy matching
//! - `split` - Equal / exact split allocation and expense validation
//! - `async` - Concurrent accrual implementations

pub mod r#async;
pub mod engine;
pub mod ledger;
pub mod split;
pub mod traits;

pub use engine::{EngineConfig, RoundingMode, SettlementEngine};
pub use ledger::BalanceLedger;
pub use r#async::{AsyncBalanceLedger, BatchProcessor};
pub use split::{equal_split, exact_split, Allocation, ExpenseDraft};
pub use traits::BalanceSheet;
