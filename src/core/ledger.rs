//! Balance accrual module
//!
//! This module provides the `BalanceLedger` struct which accrues every
//! recorded expense into a per-participant net balance.
//!
//! The BalanceLedger is responsible for:
//! - Seeding a zero balance for every known participant
//! - Crediting payers with the full expense amount
//! - Debiting each share from its participant
//! - Silently dropping contributions addressed to unknown participants
//! - Dropping any single contribution that would overflow a balance
//! - Returning balances in participant input order
//!
//! Accrual order does not affect the result unless a contribution overflows.

use crate::core::traits::BalanceSheet;
use crate::types::{Balance, Expense, Participant, ParticipantId};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Per-participant net balances for a single computation
///
/// Only participants supplied at construction time are tracked. Credits and
/// debits to any other id are ignored, which is how expenses referencing
/// removed or foreign members degrade without failing.
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    /// Participant ids in input order (first occurrence wins)
    order: Vec<ParticipantId>,

    /// Map of participant IDs to signed net balances
    balances: HashMap<ParticipantId, Decimal>,
}

impl BalanceLedger {
    /// Create a ledger with a zero balance for every participant
    ///
    /// Duplicate ids are tracked once, at the position of their first
    /// occurrence.
    ///
    /// # Arguments
    ///
    /// * `participants` - The group members to track
    pub fn new(participants: &[Participant]) -> Self {
        let mut order = Vec::with_capacity(participants.len());
        let mut balances = HashMap::with_capacity(participants.len());

        for participant in participants {
            if !balances.contains_key(&participant.id) {
                balances.insert(participant.id.clone(), Decimal::ZERO);
                order.push(participant.id.clone());
            }
        }

        BalanceLedger { order, balances }
    }

    /// Check whether a participant is tracked by this ledger
    pub fn contains(&self, participant: &str) -> bool {
        self.balances.contains_key(participant)
    }

    /// Get the current balance of a participant
    ///
    /// # Returns
    ///
    /// * `Some(Decimal)` - If the participant is tracked
    /// * `None` - If the participant is unknown
    pub fn balance(&self, participant: &str) -> Option<Decimal> {
        self.balances.get(participant).copied()
    }

    /// Increase a participant's balance (they paid for others)
    ///
    /// Unknown participants are ignored.
    pub fn credit(&mut self, participant: &str, amount: Decimal) {
        self.adjust(participant, amount, "credit");
    }

    /// Decrease a participant's balance (they consumed part of an expense)
    ///
    /// Unknown participants are ignored.
    pub fn debit(&mut self, participant: &str, amount: Decimal) {
        self.adjust(participant, -amount, "debit");
    }

    /// Accrue a single expense
    ///
    /// Credits the payer with the full expense amount and debits every share
    /// from its participant. Shares are not required to sum to the amount.
    pub fn apply_expense(&mut self, expense: &Expense) {
        self.credit(&expense.payer, expense.amount);

        for share in &expense.shares {
            self.debit(&share.participant, share.owed);
        }
    }

    /// Get all balances in participant input order
    pub fn balances(&self) -> Vec<Balance> {
        self.order
            .iter()
            .map(|id| Balance {
                participant: id.clone(),
                amount: self.balances.get(id).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Sum of all balances
    ///
    /// Zero whenever every accrued expense's shares sum to its amount and
    /// reference only known participants. `None` if the sum overflows.
    pub fn total(&self) -> Option<Decimal> {
        self.balances
            .values()
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
    }

    fn adjust(&mut self, participant: &str, delta: Decimal, operation: &str) {
        let Some(balance) = self.balances.get_mut(participant) else {
            debug!(participant, %delta, operation, "ignoring contribution for unknown participant");
            return;
        };

        match balance.checked_add(delta) {
            Some(updated) => *balance = updated,
            None => warn!(participant, %delta, operation, "arithmetic overflow, contribution dropped"),
        }
    }
}

impl BalanceSheet for BalanceLedger {
    fn accrue(&mut self, expense: &Expense) {
        self.apply_expense(expense);
    }

    fn balances(&self) -> Vec<Balance> {
        BalanceLedger::balances(self)
    }
}
