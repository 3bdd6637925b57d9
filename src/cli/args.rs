use crate::core::{EngineConfig, RoundingMode};
use crate::strategy::{BatchConfig, OutputOptions};
use clap::{ArgAction, Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Compute who pays whom to settle a group's shared expenses
#[derive(Parser, Debug)]
#[command(name = "settlement-engine")]
#[command(about = "Compute who pays whom to settle a group's shared expenses", long_about = None)]
pub struct CliArgs {
    /// Participants CSV file path (columns: id, name)
    #[arg(value_name = "PARTICIPANTS", help = "Path to the participants CSV file")]
    pub participants_file: PathBuf,

    /// Expenses CSV file path (columns: expense, title, payer, amount, split, shares)
    #[arg(value_name = "EXPENSES", help = "Path to the expenses CSV file")]
    pub expenses_file: PathBuf,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of expenses per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of expenses per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent accrual tasks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of concurrent accrual tasks (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
    pub format: OutputFormat,

    /// What to report
    #[arg(long = "report", value_name = "REPORT", default_value = "settlements")]
    pub report: ReportKind,

    /// Rounding rule for payment amounts
    #[arg(long = "rounding", value_name = "MODE", default_value = "half-up")]
    pub rounding: RoundingArg,

    /// Balances within this distance of zero are treated as settled
    #[arg(long = "tolerance", value_name = "AMOUNT", default_value = "1")]
    pub tolerance: Decimal,

    /// Decimal places of the minor currency unit
    #[arg(long = "scale", value_name = "DIGITS", default_value_t = 0)]
    pub scale: u32,

    /// Currency symbol prefixed to amounts in text output
    #[arg(long = "currency", value_name = "SYMBOL", default_value = "")]
    pub currency: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Report output formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable CSV with a header row
    #[default]
    Csv,
    /// One human-readable sentence per line
    Text,
}

/// Which report to produce
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// The list of payments that settles the group
    #[default]
    Settlements,
    /// Each participant's net balance
    Balances,
}

/// Command-line spelling of [`RoundingMode`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoundingArg {
    HalfUp,
    HalfEven,
}

impl From<RoundingArg> for RoundingMode {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::HalfUp => RoundingMode::HalfUp,
            RoundingArg::HalfEven => RoundingMode::HalfEven,
        }
    }
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the CLI values if provided, or falls back to default values.
    /// Invalid (zero) values are replaced by defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the settlement engine configuration from CLI arguments
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.tolerance, self.rounding.into(), self.scale)
    }

    /// Create report options from CLI arguments
    pub fn to_output_options(&self) -> OutputOptions {
        OutputOptions {
            format: self.format,
            report: self.report,
            currency: self.currency.clone(),
        }
    }

    /// Default log filter directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&["program", "p.csv", "e.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "p.csv", "e.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "p.csv", "e.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[test]
    fn test_positional_paths() {
        let parsed = CliArgs::try_parse_from(["program", "people.csv", "spend.csv"]).unwrap();

        assert_eq!(parsed.participants_file, PathBuf::from("people.csv"));
        assert_eq!(parsed.expenses_file, PathBuf::from("spend.csv"));
    }

    // Individual config option tests
    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "p.csv", "e.csv"], Some(2000), None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "p.csv", "e.csv"], None, Some(8))]
    #[case::no_options(&["program", "p.csv", "e.csv"], None, None)]
    fn test_batch_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent, max_concurrent);
    }

    // BatchConfig conversion tests
    #[rstest]
    #[case::all_defaults(&["program", "p.csv", "e.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "p.csv", "e.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "p.csv", "e.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "p.csv", "e.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "p.csv", "e.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent, expected_max_concurrent);
    }

    #[rstest]
    #[case::defaults(&["program", "p.csv", "e.csv"], EngineConfig::default())]
    #[case::half_even(
        &["program", "--rounding", "half-even", "p.csv", "e.csv"],
        EngineConfig { rounding: RoundingMode::HalfEven, ..EngineConfig::default() }
    )]
    #[case::cents(
        &["program", "--tolerance", "0.01", "--scale", "2", "p.csv", "e.csv"],
        EngineConfig { tolerance: Decimal::new(1, 2), scale: 2, ..EngineConfig::default() }
    )]
    #[case::non_positive_tolerance_falls_back(
        &["program", "--tolerance", "0", "p.csv", "e.csv"],
        EngineConfig::default()
    )]
    fn test_engine_config_conversion(#[case] args: &[&str], #[case] expected: EngineConfig) {
        let config = CliArgs::try_parse_from(args).unwrap().to_engine_config();

        assert_eq!(config, expected);
    }

    #[rstest]
    #[case::defaults(&["program", "p.csv", "e.csv"], OutputFormat::Csv, ReportKind::Settlements, "")]
    #[case::text_balances(
        &["program", "--format", "text", "--report", "balances", "--currency", "$", "p.csv", "e.csv"],
        OutputFormat::Text,
        ReportKind::Balances,
        "$"
    )]
    fn test_output_options_conversion(
        #[case] args: &[&str],
        #[case] format: OutputFormat,
        #[case] report: ReportKind,
        #[case] currency: &str,
    ) {
        let options = CliArgs::try_parse_from(args).unwrap().to_output_options();

        assert_eq!(options.format, format);
        assert_eq!(options.report, report);
        assert_eq!(options.currency, currency);
    }

    #[rstest]
    #[case::quiet(&["program", "p.csv", "e.csv"], "warn")]
    #[case::verbose(&["program", "-v", "p.csv", "e.csv"], "info")]
    #[case::very_verbose(&["program", "-vv", "p.csv", "e.csv"], "debug")]
    #[case::extra_verbose(&["program", "-vvv", "p.csv", "e.csv"], "debug")]
    fn test_log_level(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(CliArgs::try_parse_from(args).unwrap().log_level(), expected);
    }

    // Error handling tests
    #[rstest]
    #[case::missing_inputs(&["program"])]
    #[case::missing_expenses(&["program", "p.csv"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "p.csv", "e.csv"])]
    #[case::invalid_format(&["program", "--format", "xml", "p.csv", "e.csv"])]
    #[case::invalid_rounding(&["program", "--rounding", "down", "p.csv", "e.csv"])]
    #[case::invalid_tolerance(&["program", "--tolerance", "abc", "p.csv", "e.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
