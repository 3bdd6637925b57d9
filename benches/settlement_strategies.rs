//! Benchmark suite for the settlement engine and processing strategies
//!
//! Uses the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Inputs
//!
//! Inputs are generated deterministically rather than stored as fixtures:
//! - In-memory groups for the engine itself (accrual + settlement)
//! - Temporary CSV files for the full sync / async pipelines

use rust_decimal::Decimal;
use rust_settlement_engine::cli::StrategyType;
use rust_settlement_engine::core::EngineConfig;
use rust_settlement_engine::strategy::{create_strategy, BatchConfig, Inputs, OutputOptions};
use rust_settlement_engine::{equal_split, Expense, Participant, SettlementEngine};
use std::fmt::Write as _;
use std::io::Write;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

fn participants(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|n| Participant::new(format!("p{}", n), format!("Person {}", n)))
        .collect()
}

/// Deterministic pseudo-random expenses: payer and selection rotate
fn expenses(participants: &[Participant], count: usize) -> Vec<Expense> {
    let n = participants.len();
    (0..count)
        .map(|k| {
            let payer = &participants[k % n];
            let selected: Vec<String> = (0..(k % n) + 1)
                .map(|offset| participants[(k * 7 + offset) % n].id.clone())
                .collect();
            let amount = Decimal::from(100 + (k as i64 * 37) % 9_900);
            let shares = equal_split(amount, &selected).unwrap_or_default();
            Expense::new(payer.id.clone(), amount, shares)
        })
        .collect()
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Participants and expenses CSV files for `rows` expenses among 50 people
fn csv_inputs(rows: usize) -> (NamedTempFile, NamedTempFile) {
    let people = participants(50);

    let mut participants_csv = String::from("id,name\n");
    for p in &people {
        let _ = writeln!(participants_csv, "{},{}", p.id, p.name);
    }

    let mut expenses_csv = String::from("expense,title,payer,amount,split,shares\n");
    for (k, expense) in expenses(&people, rows).iter().enumerate() {
        let selected: Vec<&str> = expense
            .shares
            .iter()
            .map(|share| share.participant.as_str())
            .collect();
        let _ = writeln!(
            expenses_csv,
            "e{},Expense {},{},{},equal,{}",
            k,
            k,
            expense.payer,
            expense.amount,
            selected.join(";")
        );
    }

    (write_temp(&participants_csv), write_temp(&expenses_csv))
}

#[divan::bench(args = [10, 100, 1_000])]
fn compute_settlements(bencher: divan::Bencher, group_size: usize) {
    let people = participants(group_size);
    let history = expenses(&people, group_size * 10);
    let engine = SettlementEngine::default();

    bencher.bench(|| engine.compute_settlements(divan::black_box(&people), divan::black_box(&history)));
}

fn run_strategy(bencher: divan::Bencher, strategy_type: StrategyType) {
    let (participants_file, expenses_file) = csv_inputs(10_000);
    let inputs = Inputs::new(participants_file.path(), expenses_file.path());
    let strategy = create_strategy(
        strategy_type,
        Some(BatchConfig::default()),
        EngineConfig::default(),
        OutputOptions::default(),
    );

    bencher.bench(|| {
        let mut output = Vec::new();
        strategy
            .process(&inputs, &mut output)
            .expect("Processing failed");
        output
    });
}

/// Benchmark the synchronous pipeline with 10,000 expense rows
#[divan::bench]
fn sync_strategy_10k(bencher: divan::Bencher) {
    run_strategy(bencher, StrategyType::Sync);
}

/// Benchmark the asynchronous pipeline with 10,000 expense rows
#[divan::bench]
fn async_strategy_10k(bencher: divan::Bencher) {
    run_strategy(bencher, StrategyType::Async);
}
