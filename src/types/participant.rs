//! Participant-related types for the Rust Settlement Engine
//!
//! This module defines the Participant structure and the derived Balance
//! entry used while reducing a group's debts.

use rust_decimal::Decimal;

/// Participant identifier
///
/// Opaque, caller-supplied identifier (typically a UUID string).
pub type ParticipantId = String;

/// A member of an expense-sharing group
///
/// Immutable for the duration of a computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique participant identifier
    pub id: ParticipantId,

    /// Display name used by human-readable reports
    pub name: String,
}

impl Participant {
    /// Create a new participant
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Net position of one participant after all expenses are accrued
///
/// Positive = net creditor (owed money by the group).
/// Negative = net debtor (owes money to the group).
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    /// The participant this balance belongs to
    pub participant: ParticipantId,

    /// Signed net amount
    pub amount: Decimal,
}

impl Balance {
    /// Create a zero balance for the specified participant
    ///
    /// # Arguments
    ///
    /// * `participant` - The participant ID this balance tracks
    pub fn zero(participant: impl Into<ParticipantId>) -> Self {
        Balance {
            participant: participant.into(),
            amount: Decimal::ZERO,
        }
    }
}
