//! CSV format handling for participant/expense input and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - `ParticipantRecord` and `ExpenseRecord` structures for deserialization
//! - Conversion from CSV records to domain types
//! - Settlement and balance output serialization (CSV and plain text)
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Input Formats
//!
//! ```text
//! id,name
//! a,Alice
//!
//! expense,title,payer,amount,split,shares
//! e1,Dinner,a,1200,exact,a:200;b:400;c:600
//! e2,Taxi,d,300,equal,a;b;c;d
//! ```
//!
//! For `equal` splits, `shares` lists participant ids in selection order;
//! the first one absorbs the division remainder. For `exact` splits it
//! lists `id:amount` pairs.

use crate::core::split::{Allocation, ExpenseDraft};
use crate::types::{
    Balance, Expense, ExpenseShare, Participant, ParticipantId, SettlementError, SplitType,
    Transaction,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::str::FromStr;

/// Separator between entries of the `shares` column
const SHARE_SEPARATOR: char = ';';

/// Separator between id and amount in an exact share entry
const AMOUNT_SEPARATOR: char = ':';

/// CSV record for the participants file (columns: id, name)
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    #[serde(default)]
    pub name: String,
}

/// CSV record for the expenses file
///
/// Matches the input CSV format with columns:
/// expense, title, payer, amount, split, shares.
/// Amounts are kept as strings so conversion can report the raw text.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExpenseRecord {
    #[serde(default)]
    pub expense: String,
    pub title: String,
    pub payer: ParticipantId,
    pub amount: String,
    pub split: String,
    #[serde(default)]
    pub shares: String,
}

/// Convert a ParticipantRecord to a Participant
///
/// A blank name falls back to the id.
///
/// # Errors
///
/// Returns a `ParseError` if the id is empty.
pub fn convert_participant_record(record: ParticipantRecord) -> Result<Participant, SettlementError> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(SettlementError::ParseError {
            line: None,
            message: "participant id must not be empty".to_string(),
        });
    }

    let name = match record.name.trim() {
        "" => id,
        name => name,
    };

    Ok(Participant::new(id, name))
}

/// Convert an ExpenseRecord to a validated Expense
///
/// This function:
/// - Parses the split type (case-insensitive)
/// - Parses the amount string into a Decimal
/// - Parses the shares column according to the split type
/// - Validates the expense and allocates shares (see [`ExpenseDraft::into_expense`])
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
/// * `tolerance` - Accepted difference between an exact split's sum and the amount
///
/// # Returns
///
/// * `Ok(Expense)` - Successfully converted expense
/// * `Err(SettlementError)` - Parse or validation failure
pub fn convert_expense_record(
    record: ExpenseRecord,
    tolerance: Decimal,
) -> Result<Expense, SettlementError> {
    let split = parse_split_type(&record.split)?;
    let amount = parse_amount(&record.amount)?;
    let allocation = parse_allocation(split, &record.shares)?;

    let draft = ExpenseDraft {
        title: record.title,
        payer: record.payer.trim().to_string(),
        amount,
        allocation,
    };

    draft.into_expense(tolerance)
}

/// Parse a split type string (`equal` or `exact`, any case)
pub fn parse_split_type(split: &str) -> Result<SplitType, SettlementError> {
    match split.trim().to_lowercase().as_str() {
        "equal" => Ok(SplitType::Equal),
        "exact" => Ok(SplitType::Exact),
        _ => Err(SettlementError::unknown_split_type(split)),
    }
}

/// Parse a decimal amount, ignoring surrounding whitespace
pub fn parse_amount(amount: &str) -> Result<Decimal, SettlementError> {
    Decimal::from_str(amount.trim()).map_err(|_| SettlementError::invalid_amount(amount))
}

/// Parse the `shares` column for the given split type
///
/// Empty entries (e.g. a trailing `;`) are ignored.
pub fn parse_allocation(split: SplitType, shares: &str) -> Result<Allocation, SettlementError> {
    let entries = shares
        .split(SHARE_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    match split {
        SplitType::Equal => Ok(Allocation::Equal(entries.map(str::to_string).collect())),
        SplitType::Exact => {
            let shares = entries
                .map(parse_exact_share)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Allocation::Exact(shares))
        }
    }
}

fn parse_exact_share(entry: &str) -> Result<ExpenseShare, SettlementError> {
    let (participant, owed) = entry
        .split_once(AMOUNT_SEPARATOR)
        .ok_or_else(|| SettlementError::malformed_share(entry))?;

    let participant = participant.trim();
    if participant.is_empty() {
        return Err(SettlementError::malformed_share(entry));
    }

    Ok(ExpenseShare::new(participant, parse_amount(owed)?))
}

/// Map participant ids to display names (first occurrence wins)
pub fn participant_names(participants: &[Participant]) -> HashMap<&str, &str> {
    let mut names = HashMap::with_capacity(participants.len());
    for participant in participants {
        names
            .entry(participant.id.as_str())
            .or_insert(participant.name.as_str());
    }
    names
}

/// Format an amount with exactly `scale` decimal places
pub fn format_amount(amount: Decimal, scale: u32) -> String {
    format!("{:.*}", scale as usize, amount)
}

fn write_failure(context: &str, error: csv::Error) -> SettlementError {
    SettlementError::IoError {
        message: format!("{}: {}", context, error),
    }
}

/// Write settlement transactions in CSV format
///
/// Writes one row per transaction with columns: from, to, amount.
/// Rows keep the order the engine produced them in.
///
/// # Arguments
///
/// * `transactions` - Settlement plan to write
/// * `scale` - Decimal places for amounts
/// * `output` - Writer for the CSV output
pub fn write_settlements_csv(
    transactions: &[Transaction],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["from", "to", "amount"])
        .map_err(|e| write_failure("Failed to write CSV header", e))?;

    for transaction in transactions {
        writer
            .write_record([
                transaction.from.as_str(),
                transaction.to.as_str(),
                format_amount(transaction.amount, scale).as_str(),
            ])
            .map_err(|e| write_failure("Failed to write settlement record", e))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write settlement transactions as human-readable lines
///
/// Each line reads `"{from} pays {to} {currency}{amount}"`, using display
/// names where known and ids otherwise.
pub fn write_settlements_text(
    transactions: &[Transaction],
    names: &HashMap<&str, &str>,
    currency: &str,
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    for transaction in transactions {
        writeln!(
            output,
            "{} pays {} {}{}",
            display_name(names, &transaction.from),
            display_name(names, &transaction.to),
            currency,
            format_amount(transaction.amount, scale),
        )?;
    }

    output.flush()?;
    Ok(())
}

/// Write per-participant balances in CSV format
///
/// Columns: participant, name, balance. Balances are written at full
/// precision, without trailing zeros.
pub fn write_balances_csv(
    balances: &[Balance],
    names: &HashMap<&str, &str>,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["participant", "name", "balance"])
        .map_err(|e| write_failure("Failed to write CSV header", e))?;

    for balance in balances {
        writer
            .write_record([
                balance.participant.as_str(),
                display_name(names, &balance.participant),
                balance.amount.normalize().to_string().as_str(),
            ])
            .map_err(|e| write_failure("Failed to write balance record", e))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write per-participant balances as `"{name}: {balance}"` lines
pub fn write_balances_text(
    balances: &[Balance],
    names: &HashMap<&str, &str>,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    for balance in balances {
        writeln!(
            output,
            "{}: {}",
            display_name(names, &balance.participant),
            balance.amount.normalize(),
        )?;
    }

    output.flush()?;
    Ok(())
}

fn display_name<'a>(names: &HashMap<&str, &'a str>, id: &'a str) -> &'a str {
    names.get(id).copied().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn record(split: &str, amount: &str, shares: &str) -> ExpenseRecord {
        ExpenseRecord {
            expense: "e1".to_string(),
            title: "Dinner".to_string(),
            payer: "a".to_string(),
            amount: amount.to_string(),
            split: split.to_string(),
            shares: shares.to_string(),
        }
    }

    fn people() -> Vec<Participant> {
        vec![
            Participant::new("a", "Alice"),
            Participant::new("b", "Bob"),
        ]
    }

    #[rstest]
    #[case::named(ParticipantRecord { id: "a".into(), name: "Alice".into() }, "a", "Alice")]
    #[case::trimmed(ParticipantRecord { id: " a ".into(), name: " Alice ".into() }, "a", "Alice")]
    #[case::blank_name_uses_id(ParticipantRecord { id: "a".into(), name: "".into() }, "a", "a")]
    fn test_convert_participant_record(
        #[case] input: ParticipantRecord,
        #[case] id: &str,
        #[case] name: &str,
    ) {
        let participant = convert_participant_record(input).unwrap();

        assert_eq!(participant, Participant::new(id, name));
    }

    #[test]
    fn test_convert_participant_record_rejects_empty_id() {
        let result = convert_participant_record(ParticipantRecord {
            id: "  ".into(),
            name: "Nobody".into(),
        });

        assert!(matches!(result, Err(SettlementError::ParseError { .. })));
    }

    #[rstest]
    #[case("equal", SplitType::Equal)]
    #[case("EQUAL", SplitType::Equal)]
    #[case(" Exact ", SplitType::Exact)]
    fn test_parse_split_type(#[case] input: &str, #[case] expected: SplitType) {
        assert_eq!(parse_split_type(input).unwrap(), expected);
    }

    #[rstest]
    #[case("  100  ", dec(100))]
    #[case("12.50", Decimal::new(1250, 2))]
    fn test_parse_amount(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[test]
    fn test_convert_equal_expense_record() {
        let expense = convert_expense_record(record("equal", "100", "b;c;a"), Decimal::ONE).unwrap();

        assert_eq!(expense.payer, "a");
        assert_eq!(expense.amount, dec(100));
        assert_eq!(
            expense.shares,
            vec![
                ExpenseShare::new("b", dec(34)),
                ExpenseShare::new("c", dec(33)),
                ExpenseShare::new("a", dec(33)),
            ]
        );
    }

    #[test]
    fn test_convert_exact_expense_record() {
        let expense = convert_expense_record(
            record("exact", "1200", "a:200; b:400 ;c:600;"),
            Decimal::ONE,
        )
        .unwrap();

        assert_eq!(
            expense.shares,
            vec![
                ExpenseShare::new("a", dec(200)),
                ExpenseShare::new("b", dec(400)),
                ExpenseShare::new("c", dec(600)),
            ]
        );
    }

    #[rstest]
    #[case::unknown_split(record("percent", "100", "a"), "Unknown split type")]
    #[case::invalid_amount(record("equal", "lots", "a"), "Invalid amount")]
    #[case::empty_amount(record("equal", "", "a"), "Invalid amount")]
    #[case::non_positive_amount(record("equal", "0", "a"), "must be positive")]
    #[case::nobody_selected(record("equal", "100", " ; "), "at least one selected participant")]
    #[case::share_without_amount(record("exact", "100", "a"), "Malformed share entry")]
    #[case::share_without_id(record("exact", "100", ":100"), "Malformed share entry")]
    #[case::share_invalid_amount(record("exact", "100", "a:x"), "Invalid amount")]
    #[case::exact_mismatch(record("exact", "100", "a:50;b:40"), "Split shares sum to 90")]
    #[case::exact_shares_overflow(
        record("exact", "100", "a:50000000000000000000000000000;b:50000000000000000000000000000"),
        "exceed the supported amount range"
    )]
    fn test_convert_expense_record_errors(#[case] input: ExpenseRecord, #[case] expected: &str) {
        let error = convert_expense_record(input, Decimal::ONE).unwrap_err();

        assert!(
            error.to_string().contains(expected),
            "expected '{}' in '{}'",
            expected,
            error
        );
    }

    #[test]
    fn test_convert_expense_record_rejects_blank_title() {
        let mut input = record("equal", "100", "a");
        input.title = " ".to_string();

        assert_eq!(
            convert_expense_record(input, Decimal::ONE),
            Err(SettlementError::EmptyTitle)
        );
    }

    #[test]
    fn test_participant_names_first_occurrence_wins() {
        let participants = vec![
            Participant::new("a", "Alice"),
            Participant::new("a", "Impostor"),
        ];

        let names = participant_names(&participants);

        assert_eq!(names.get("a"), Some(&"Alice"));
    }

    #[rstest]
    #[case::integer(dec(500), 0, "500")]
    #[case::padded(dec(500), 2, "500.00")]
    #[case::cents(Decimal::new(12345, 2), 2, "123.45")]
    fn test_format_amount(#[case] amount: Decimal, #[case] scale: u32, #[case] expected: &str) {
        assert_eq!(format_amount(amount, scale), expected);
    }

    #[rstest]
    #[case::empty(vec![], "from,to,amount\n")]
    #[case::single(vec![Transaction::new("b", "a", dec(500))], "from,to,amount\nb,a,500\n")]
    #[case::keeps_engine_order(
        vec![
            Transaction::new("c", "a", dec(675)),
            Transaction::new("b", "a", dec(250)),
            Transaction::new("b", "d", dec(225)),
        ],
        "from,to,amount\nc,a,675\nb,a,250\nb,d,225\n"
    )]
    fn test_write_settlements_csv(#[case] transactions: Vec<Transaction>, #[case] expected: &str) {
        let mut output = Vec::new();

        write_settlements_csv(&transactions, 0, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_settlements_text() {
        let participants = people();
        let names = participant_names(&participants);
        let transactions = vec![
            Transaction::new("b", "a", Decimal::new(1250, 2)),
            Transaction::new("z", "a", dec(3)),
        ];
        let mut output = Vec::new();

        write_settlements_text(&transactions, &names, "$", 2, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Bob pays Alice $12.50\nz pays Alice $3.00\n"
        );
    }

    #[test]
    fn test_write_balances_csv() {
        let participants = people();
        let names = participant_names(&participants);
        let balances = vec![
            Balance {
                participant: "a".into(),
                amount: Decimal::new(50050, 2),
            },
            Balance {
                participant: "b".into(),
                amount: dec(-500),
            },
        ];
        let mut output = Vec::new();

        write_balances_csv(&balances, &names, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "participant,name,balance\na,Alice,500.5\nb,Bob,-500\n"
        );
    }

    #[test]
    fn test_write_balances_text() {
        let participants = people();
        let names = participant_names(&participants);
        let balances = vec![
            Balance::zero("a"),
            Balance {
                participant: "b".into(),
                amount: dec(-20),
            },
        ];
        let mut output = Vec::new();

        write_balances_text(&balances, &names, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Alice: 0\nBob: -20\n");
    }
}
