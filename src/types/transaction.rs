//! Settlement transaction types for the Rust Settlement Engine
//!
//! A transaction is the engine's output: one recommended point-to-point
//! payment that moves outstanding balances toward zero.

use super::participant::ParticipantId;
use rust_decimal::Decimal;

/// A recommended payment: `from` pays `to` the given `amount`
///
/// Every transaction produced by the engine has `amount > 0` and
/// `from != to`. The amount is rounded to the configured minor unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The debtor who pays
    pub from: ParticipantId,

    /// The creditor who receives
    pub to: ParticipantId,

    /// Amount to pay, rounded to the minor currency unit
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(from: impl Into<ParticipantId>, to: impl Into<ParticipantId>, amount: Decimal) -> Self {
        Transaction {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}
