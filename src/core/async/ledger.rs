//! Thread-safe balance accrual for async batch processing
//!
//! This module provides the `AsyncBalanceLedger` struct, which accrues expenses
//! using concurrent data structures so that many tasks can apply expenses at
//! the same time.
//!
//! # Design
//!
//! Balances live in a `DashMap`, which provides fine-grained locking per
//! participant. Because accrual is pure addition, the order in which tasks
//! apply expenses does not change the final balances: the concurrent ledger
//! ends in the same state as the synchronous `BalanceLedger` fed the same
//! expenses.
//!
//! This holds only while no balance overflows. An overflowing contribution
//! is dropped, and whether it overflows depends on which expenses were
//! accrued before it.
//!
//! The set of known participants is fixed at construction; like the
//! synchronous ledger, contributions for unknown ids are dropped.

use crate::core::traits::BalanceSheet;
use crate::types::{Balance, Expense, Participant, ParticipantId};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Thread-safe per-participant balances
///
/// All methods take `&self` and are safe to call from multiple threads
/// concurrently. Wrap in `Arc` to share across tasks.
#[derive(Debug)]
pub struct AsyncBalanceLedger {
    /// Participant ids in input order (first occurrence wins)
    order: Vec<ParticipantId>,

    /// Concurrent map storing balances by participant ID
    balances: DashMap<ParticipantId, Decimal>,
}

impl AsyncBalanceLedger {
    /// Create a ledger with a zero balance for every participant
    ///
    /// # Arguments
    ///
    /// * `participants` - The group members to track
    pub fn new(participants: &[Participant]) -> Self {
        let mut order = Vec::with_capacity(participants.len());
        let balances = DashMap::with_capacity(participants.len());

        for participant in participants {
            if !balances.contains_key(&participant.id) {
                balances.insert(participant.id.clone(), Decimal::ZERO);
                order.push(participant.id.clone());
            }
        }

        Self { order, balances }
    }

    /// Get the current balance of a participant
    pub fn balance(&self, participant: &str) -> Option<Decimal> {
        self.balances.get(participant).map(|entry| *entry)
    }

    /// Accrue a single expense
    ///
    /// Each participant entry is locked only for the duration of its own
    /// update, so concurrent callers touching different participants never
    /// block each other.
    pub fn apply_expense(&self, expense: &Expense) {
        self.adjust(&expense.payer, expense.amount, "credit");

        for share in &expense.shares {
            self.adjust(&share.participant, -share.owed, "debit");
        }
    }

    /// Snapshot all balances in participant input order
    ///
    /// The snapshot is consistent once every accruing task has finished.
    pub fn balances(&self) -> Vec<Balance> {
        self.order
            .iter()
            .map(|id| Balance {
                participant: id.clone(),
                amount: self.balance(id).unwrap_or_default(),
            })
            .collect()
    }

    fn adjust(&self, participant: &str, delta: Decimal, operation: &str) {
        let Some(mut balance) = self.balances.get_mut(participant) else {
            debug!(participant, %delta, operation, "ignoring contribution for unknown participant");
            return;
        };

        match balance.checked_add(delta) {
            Some(updated) => *balance = updated,
            None => warn!(participant, %delta, operation, "arithmetic overflow, contribution dropped"),
        }
    }
}

impl BalanceSheet for AsyncBalanceLedger {
    fn accrue(&mut self, expense: &Expense) {
        self.apply_expense(expense);
    }

    fn balances(&self) -> Vec<Balance> {
        AsyncBalanceLedger::balances(self)
    }
}
