//! Rust Settlement Engine CLI
//!
//! Command-line interface for settling a group's shared expenses from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- participants.csv expenses.csv > settlements.csv
//! cargo run -- --strategy sync participants.csv expenses.csv
//! cargo run -- --format text --currency '$' --scale 2 --tolerance 0.01 participants.csv expenses.csv
//! cargo run -- --report balances participants.csv expenses.csv
//! RUST_LOG=debug cargo run -- participants.csv expenses.csv
//! ```
//!
//! The report goes to stdout; logs (skipped rows, summaries) go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, invalid participants file, output failure, etc.)

use rust_settlement_engine::cli;
use rust_settlement_engine::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = cli::parse_args();
    init_logging(args.log_level());

    let strategy = {
        let batch_config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(
            args.strategy,
            batch_config,
            args.to_engine_config(),
            args.to_output_options(),
        )
    };

    let inputs = strategy::Inputs::new(&args.participants_file, &args.expenses_file);
    let mut output = std::io::stdout().lock();
    if let Err(e) = strategy.process(&inputs, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
