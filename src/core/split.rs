//! Expense split allocation and validation
//!
//! Before an expense reaches the engine, its total has to be allocated across
//! participants. Two policies are supported:
//!
//! - **Equal**: floor-divide the total by the number of selected participants;
//!   the remainder (`total - per_person * count`) goes entirely to the first
//!   selected participant, so shares always sum to the total exactly.
//! - **Exact**: the caller lists every participant's owed amount; the list is
//!   accepted only if it sums to the total within tolerance.
//!
//! Zero-amount shares are dropped by both policies.
//!
//! `ExpenseDraft` bundles the validation a create-expense form performs
//! (title present, amount positive) with the chosen allocation.

use crate::types::{Expense, ExpenseShare, ParticipantId, SettlementError, SplitType};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// How an expense total is allocated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// Equal split among the selected participants, in selection order
    Equal(Vec<ParticipantId>),

    /// Caller-specified owed amounts
    Exact(Vec<ExpenseShare>),
}

impl Allocation {
    /// The split policy this allocation uses
    pub fn split_type(&self) -> SplitType {
        match self {
            Allocation::Equal(_) => SplitType::Equal,
            Allocation::Exact(_) => SplitType::Exact,
        }
    }
}

/// An expense as entered, before validation and allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    /// Short description (e.g. "Lunch", "Taxi")
    pub title: String,

    /// The participant who paid
    pub payer: ParticipantId,

    /// Total amount paid
    pub amount: Decimal,

    /// Allocation of the amount across participants
    pub allocation: Allocation,
}

impl ExpenseDraft {
    /// Validate the draft and build the expense
    ///
    /// # Arguments
    ///
    /// * `tolerance` - Accepted difference between an exact split's sum and the total
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is empty or whitespace
    /// - The amount is zero or negative
    /// - The allocation is invalid (see [`equal_split`] and [`exact_split`])
    pub fn into_expense(self, tolerance: Decimal) -> Result<Expense, SettlementError> {
        if self.title.trim().is_empty() {
            return Err(SettlementError::EmptyTitle);
        }

        if self.amount <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveAmount {
                amount: self.amount,
            });
        }

        let shares = match self.allocation {
            Allocation::Equal(selected) => equal_split(self.amount, &selected)?,
            Allocation::Exact(shares) => exact_split(self.amount, shares, tolerance)?,
        };

        Ok(Expense {
            payer: self.payer,
            amount: self.amount,
            shares,
        })
    }
}

/// Split a total evenly across the selected participants
///
/// Repeated ids are counted once, at their first position. The first
/// selected participant absorbs the remainder.
///
/// # Errors
///
/// Returns `NoParticipantsSelected` if `selected` is empty, and
/// `SharesOverflow` if the shares cannot be recombined within `Decimal` range.
pub fn equal_split(
    total: Decimal,
    selected: &[ParticipantId],
) -> Result<Vec<ExpenseShare>, SettlementError> {
    let mut seen = HashSet::with_capacity(selected.len());
    let targets: Vec<&ParticipantId> = selected.iter().filter(|id| seen.insert(*id)).collect();

    if targets.is_empty() {
        return Err(SettlementError::NoParticipantsSelected);
    }

    let count = Decimal::from(targets.len());
    let per_person = (total / count).floor();
    let remainder = per_person
        .checked_mul(count)
        .and_then(|allocated| total.checked_sub(allocated))
        .ok_or(SettlementError::SharesOverflow)?;

    let shares = targets
        .into_iter()
        .enumerate()
        .map(|(index, id)| {
            let owed = if index == 0 {
                per_person + remainder
            } else {
                per_person
            };
            ExpenseShare::new(id.clone(), owed)
        })
        .filter(|share| !share.owed.is_zero())
        .collect();

    Ok(shares)
}

/// Validate a caller-specified split
///
/// # Errors
///
/// Returns an error if:
/// - Any share is negative
/// - A participant is listed twice
/// - The shares add up to more than a `Decimal` can represent
/// - The shares differ from `total` by `tolerance` or more
pub fn exact_split(
    total: Decimal,
    shares: Vec<ExpenseShare>,
    tolerance: Decimal,
) -> Result<Vec<ExpenseShare>, SettlementError> {
    let mut seen = HashSet::with_capacity(shares.len());

    for share in &shares {
        if share.owed < Decimal::ZERO {
            return Err(SettlementError::negative_share(&share.participant, share.owed));
        }
        if !seen.insert(share.participant.as_str()) {
            return Err(SettlementError::duplicate_share(&share.participant));
        }
    }

    let sum = shares
        .iter()
        .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(share.owed))
        .ok_or(SettlementError::SharesOverflow)?;
    if (sum - total).abs() >= tolerance {
        return Err(SettlementError::split_mismatch(total, sum));
    }

    Ok(shares.into_iter().filter(|share| !share.owed.is_zero()).collect())
}
