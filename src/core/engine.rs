//! Settlement engine
//!
//! This module provides the SettlementEngine that reduces a group's recorded
//! expenses to a short list of point-to-point payments.
//!
//! The reduction runs in four steps:
//! 1. Accrual - every expense credits its payer and debits its shares
//!    (delegated to a [`BalanceSheet`])
//! 2. Classification - balances beyond the tolerance become debtors or
//!    creditors; everything within it is considered settled
//! 3. Sort - debtors most-negative first, creditors most-positive first,
//!    ties kept in participant input order
//! 4. Greedy matching - a two-pointer sweep pairs the current debtor with
//!    the current creditor and pays the smaller of the two magnitudes
//!
//! The result is not guaranteed to be the minimum number of payments, but
//! at most `debtors + creditors - 1` payments are ever produced.
//!
//! The engine is pure: it owns no shared state and performs no I/O, so it is
//! safe to call concurrently with independent inputs.

use crate::core::ledger::BalanceLedger;
use crate::core::traits::BalanceSheet;
use crate::types::{Balance, Expense, Participant, Transaction};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

/// Tie-breaking rule used when rounding payment amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Round half away from zero (e.g., 4.5 -> 5)
    #[default]
    HalfUp,
    /// Round half to nearest even number (e.g., 4.5 -> 4, 5.5 -> 6)
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Settlement engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Balances with magnitude at or below this are considered settled
    ///
    /// Also used to decide when a partially matched balance is exhausted.
    /// Expressed in the same unit as expense amounts.
    pub tolerance: Decimal,

    /// Rounding rule for emitted payment amounts
    pub rounding: RoundingMode,

    /// Decimal places of the minor currency unit (0 for JPY)
    pub scale: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::ONE,
            rounding: RoundingMode::HalfUp,
            scale: 0,
        }
    }
}

impl EngineConfig {
    /// Create a new EngineConfig with custom values
    ///
    /// A non-positive tolerance would let a participant be both debtor and
    /// creditor, so it falls back to the default.
    pub fn new(tolerance: Decimal, rounding: RoundingMode, scale: u32) -> Self {
        let default = Self::default();

        let tolerance = if tolerance <= Decimal::ZERO {
            warn!(
                %tolerance,
                fallback = %default.tolerance,
                "invalid tolerance, using default"
            );
            default.tolerance
        } else {
            tolerance
        };

        Self {
            tolerance,
            rounding,
            scale,
        }
    }
}

/// Debt-settlement reduction engine
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_settlement_engine::core::SettlementEngine;
/// use rust_settlement_engine::types::{Expense, ExpenseShare, Participant};
///
/// let participants = vec![Participant::new("a", "Alice"), Participant::new("b", "Bob")];
/// let expenses = vec![Expense::new(
///     "a",
///     Decimal::from(1000),
///     vec![
///         ExpenseShare::new("a", Decimal::from(500)),
///         ExpenseShare::new("b", Decimal::from(500)),
///     ],
/// )];
///
/// let plan = SettlementEngine::default().compute_settlements(&participants, &expenses);
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan[0].from, "b");
/// assert_eq!(plan[0].to, "a");
/// assert_eq!(plan[0].amount, Decimal::from(500));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    /// Create a new SettlementEngine
    ///
    /// # Arguments
    ///
    /// * `config` - Tolerance, rounding and scale settings
    pub fn new(config: EngineConfig) -> Self {
        let config = EngineConfig::new(config.tolerance, config.rounding, config.scale);
        SettlementEngine { config }
    }

    /// Get the active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the settlement plan for a group
    ///
    /// Accrues every expense, then settles the resulting balances. Expense
    /// contributions referencing ids not present in `participants` are
    /// dropped. Never fails: inconsistent inputs simply leave some balance
    /// unsettled.
    ///
    /// # Arguments
    ///
    /// * `participants` - The group members
    /// * `expenses` - Recorded expenses with their shares
    ///
    /// # Returns
    ///
    /// The ordered list of payments that moves every balance toward zero
    pub fn compute_settlements(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Vec<Transaction> {
        let mut ledger = BalanceLedger::new(participants);
        for expense in expenses {
            ledger.accrue(expense);
        }
        self.settle_sheet(&ledger)
    }

    /// Compute net balances only (step 1)
    ///
    /// # Returns
    ///
    /// One balance per distinct participant, in input order
    pub fn compute_balances(&self, participants: &[Participant], expenses: &[Expense]) -> Vec<Balance> {
        let mut ledger = BalanceLedger::new(participants);
        for expense in expenses {
            ledger.accrue(expense);
        }
        ledger.balances()
    }

    /// Settle the balances held by any ledger implementation
    pub fn settle_sheet<S: BalanceSheet + ?Sized>(&self, sheet: &S) -> Vec<Transaction> {
        self.settle(sheet.balances())
    }

    /// Settle already-accrued balances (steps 2-4)
    ///
    /// # Arguments
    ///
    /// * `balances` - Net balances in participant input order
    ///
    /// # Returns
    ///
    /// Payments in matching order. Every payment has a strictly positive
    /// amount and distinct `from` / `to`.
    pub fn settle(&self, balances: Vec<Balance>) -> Vec<Transaction> {
        let (mut debtors, mut creditors) = self.classify(balances);

        // Stable sorts: equal balances stay in participant input order
        debtors.sort_by(|a, b| a.amount.cmp(&b.amount));
        creditors.sort_by(|a, b| b.amount.cmp(&a.amount));

        let tolerance = self.config.tolerance;
        let mut transactions = Vec::with_capacity(debtors.len() + creditors.len());
        let mut i = 0;
        let mut j = 0;

        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let amount = debtor.amount.abs().min(creditor.amount);
            let rounded = self.round(amount);

            if rounded > Decimal::ZERO {
                transactions.push(Transaction {
                    from: debtor.participant.clone(),
                    to: creditor.participant.clone(),
                    amount: rounded,
                });
            } else {
                debug!(
                    from = %debtor.participant,
                    to = %creditor.participant,
                    %amount,
                    "matched amount rounds to zero, no payment emitted"
                );
            }

            debtor.amount += amount;
            creditor.amount -= amount;

            // The zero checks keep the sweep moving even for sub-unit tolerances
            if debtor.amount.abs() < tolerance || debtor.amount.is_zero() {
                i += 1;
            }
            if creditor.amount < tolerance || creditor.amount.is_zero() {
                j += 1;
            }
        }

        let unsettled = (debtors.len() - i) + (creditors.len() - j);
        if unsettled > 0 {
            debug!(unsettled, "residual balances left unsettled (inconsistent shares)");
        }

        transactions
    }

    /// Partition balances into debtors and creditors
    ///
    /// Balances within `[-tolerance, +tolerance]` are settled and dropped.
    fn classify(&self, balances: Vec<Balance>) -> (Vec<Balance>, Vec<Balance>) {
        let tolerance = self.config.tolerance;
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for balance in balances {
            if balance.amount < -tolerance {
                debtors.push(balance);
            } else if balance.amount > tolerance {
                creditors.push(balance);
            }
        }

        (debtors, creditors)
    }

    fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.config.scale, self.config.rounding.strategy())
    }
}
