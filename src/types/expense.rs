//! Expense-related types for the Rust Settlement Engine
//!
//! This module defines recorded expenses, their per-participant shares,
//! and the split policies used to allocate an expense across participants.

use super::participant::ParticipantId;
use rust_decimal::Decimal;

/// Allocation policy for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitType {
    /// Divide the amount evenly among the selected participants
    ///
    /// Uses floor division; the remainder goes to the first selected
    /// participant so that shares always sum to the expense total.
    Equal,

    /// Caller specifies each participant's owed amount
    ///
    /// The specified amounts must sum to the expense total (within tolerance).
    Exact,
}

/// Amount owed by one participant toward one expense
///
/// Non-negative. Zero-amount shares carry no information and are
/// omitted by the split allocators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseShare {
    /// The participant who consumed part of the expense
    pub participant: ParticipantId,

    /// The amount this participant owes toward the expense
    pub owed: Decimal,
}

impl ExpenseShare {
    pub fn new(participant: impl Into<ParticipantId>, owed: Decimal) -> Self {
        ExpenseShare {
            participant: participant.into(),
            owed,
        }
    }
}

/// A single recorded payment made by one participant on behalf of others
///
/// The sum of `shares` is expected to approximate `amount`, but the
/// engine does not require it: `amount` credits the payer and each
/// share debits its participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// The participant who paid
    pub payer: ParticipantId,

    /// Total amount paid
    pub amount: Decimal,

    /// Per-participant owed amounts
    pub shares: Vec<ExpenseShare>,
}

impl Expense {
    pub fn new(payer: impl Into<ParticipantId>, amount: Decimal, shares: Vec<ExpenseShare>) -> Self {
        Expense {
            payer: payer.into(),
            amount,
            shares,
        }
    }

    /// Sum of all shares of this expense
    ///
    /// Returns `None` if the sum overflows.
    pub fn shares_total(&self) -> Option<Decimal> {
        self.shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(share.owed))
    }
}
