//! Core traits for balance accrual
//!
//! This module defines the trait abstraction that allows both the synchronous
//! and the concurrent ledger to feed the same settlement engine.

use crate::types::{Balance, Expense};

/// Trait for accruing expenses into per-participant balances
///
/// Implementations can be synchronous (using HashMap) or concurrent (using DashMap).
pub trait BalanceSheet {
    /// Accrue a single expense
    fn accrue(&mut self, expense: &Expense);

    /// Get all balances in participant input order
    fn balances(&self) -> Vec<Balance>;
}
