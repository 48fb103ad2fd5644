use anyhow::{Context, Result};
use backtester::{BacktestError, Backtester, RunContext, RunSummary, write_outputs};
use bar_store::BarRepository;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, load_config};
use core_types::StrategyId;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use strategies::create_strategy;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const RUN_LOG_FILE: &str = "run.log";

/// The main entry point for the barsim backtester.
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => handle_run(args),
        Commands::CheckData(args) => handle_check_data(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// An event-driven daily-bar backtester for equities.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the configured universe through a strategy and write the run records.
    Run(RunArgs),
    /// Load the configured universe and report what would be replayed.
    CheckData(CheckDataArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Path to the TOML run configuration.
    #[arg(long, short)]
    config: PathBuf,

    /// The strategy to run.
    #[arg(long, value_enum, default_value_t = StrategyId::SmaCrossover)]
    strategy: StrategyId,

    /// Overrides `backtest.output_dir`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Disables the progress bar.
    #[arg(long)]
    no_progress: bool,
}

#[derive(Parser)]
struct CheckDataArgs {
    /// Path to the TOML run configuration.
    #[arg(long, short)]
    config: PathBuf,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Logs to stderr and, when `log_dir` is given, to `<log_dir>/run.log`.
///
/// The returned guard must be held until exit so buffered file output is flushed.
fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, RUN_LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

fn load(path: &Path) -> Result<Config> {
    load_config(path).with_context(|| format!("Failed to load configuration from {}", path.display()))
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

fn handle_run(args: RunArgs) -> Result<()> {
    let mut config = load(&args.config)?;
    if let Some(output) = args.output {
        config.backtest.output_dir = output;
    }
    let output_dir = config.backtest.output_dir.clone();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let _guard = init_tracing(Some(&output_dir))?;

    tracing::info!(
        "Backtesting {:?} on {} instruments against {} from {} to {}",
        args.strategy,
        config.backtest.symbols.len(),
        config.backtest.benchmark,
        config.backtest.start_date,
        config.backtest.end_date
    );

    let strategy = create_strategy(args.strategy, &config)?;
    let ctx = RunContext::load(config)?;
    let mut backtester = Backtester::new(ctx, strategy);
    if !args.no_progress {
        backtester = backtester.with_progress()?;
    }

    let result = backtester.run();
    let summary = backtester.summary();
    let written = write_outputs(&output_dir, backtester.context(), &summary);
    check_written(written, &result)?;
    print_summary(&summary, &output_dir);

    result.with_context(|| {
        format!(
            "Backtest aborted; partial records were written to {}",
            output_dir.display()
        )
    })?;
    Ok(())
}

/// Turns a failed record write into the command's error without losing the
/// run's own fatal error, if there was one.
fn check_written<T>(written: Result<(), BacktestError>, run: &Result<T, BacktestError>) -> Result<()> {
    written.with_context(|| match run {
        Ok(_) => "Failed to write run records".to_string(),
        Err(e) => format!("Failed to write run records after the backtest aborted ({e})"),
    })
}

fn print_summary(summary: &RunSummary, output_dir: &Path) {
    let total_return = if summary.initial_capital.is_zero() {
        Decimal::ZERO
    } else {
        ((summary.final_value - summary.initial_capital) / summary.initial_capital
            * Decimal::ONE_HUNDRED)
            .round_dp(2)
    };
    let pruned = if summary.pruned.is_empty() {
        "-".to_string()
    } else {
        summary.pruned.join(", ")
    };

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Run ID", summary.run_id.to_string()),
        ("Strategy", summary.strategy.clone()),
        ("Ticks", summary.ticks.to_string()),
        ("Fills", summary.fills.to_string()),
        ("Rejected Orders", summary.rejected_orders.to_string()),
        ("Initial Capital", summary.initial_capital.to_string()),
        ("Final Value", summary.final_value.round_dp(2).to_string()),
        ("Total Return", format!("{total_return}%")),
        ("Pruned", pruned),
        ("Records", output_dir.display().to_string()),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    println!("{table}");
}

// ==============================================================================
// Check-Data Command Logic
// ==============================================================================

fn handle_check_data(args: CheckDataArgs) -> Result<()> {
    let config = load(&args.config)?;
    let _guard = init_tracing(None)?;

    let backtest = &config.backtest;
    tracing::info!(
        "Checking {} instruments in {}",
        config.full_symbol_list().len(),
        backtest.data_dir.display()
    );
    let repo = BarRepository::new(&backtest.data_dir, backtest.start_date, backtest.end_date);
    let universe = repo
        .load_universe(&backtest.benchmark, &backtest.symbols)
        .with_context(|| format!("Benchmark {} cannot be loaded", backtest.benchmark))?;

    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Role", "First Date", "Bars", "Warm-up Bars"]);
    let benchmark = &universe.benchmark;
    table.add_row(vec![
        benchmark.symbol.clone(),
        "benchmark".to_string(),
        benchmark.first_date().to_string(),
        benchmark.len().to_string(),
        benchmark.warmup.len().to_string(),
    ]);
    for series in &universe.instruments {
        let role = if series.first_date() > benchmark.first_date() {
            "tradable (late listing)"
        } else {
            "tradable"
        };
        table.add_row(vec![
            series.symbol.clone(),
            role.to_string(),
            series.first_date().to_string(),
            series.len().to_string(),
            series.warmup.len().to_string(),
        ]);
    }
    println!("{table}");

    if universe.pruned.is_empty() {
        println!("All configured instruments are available.");
    } else {
        println!("Pruned (no usable data): {}", universe.pruned.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_failure(path: &str, reason: &str) -> BacktestError {
        BacktestError::Io {
            path: PathBuf::from(path),
            source: io::Error::other(reason.to_string()),
        }
    }

    #[test]
    fn write_failure_keeps_the_run_error() {
        let run: Result<(), BacktestError> = Err(io_failure("data/SHORT.csv", "truncated"));
        let written = Err(io_failure("out/summary.json", "read-only"));
        let message = format!("{:#}", check_written(written, &run).unwrap_err());
        assert!(message.contains("after the backtest aborted"), "{message}");
        assert!(message.contains("data/SHORT.csv"), "{message}");
        assert!(message.contains("out/summary.json"), "{message}");
    }

    #[test]
    fn write_failure_after_a_clean_run() {
        let written = Err(io_failure("out/summary.json", "read-only"));
        let message = format!("{:#}", check_written(written, &Ok(())).unwrap_err());
        assert!(message.starts_with("Failed to write run records:"), "{message}");
        assert!(!message.contains("aborted"), "{message}");
    }

    #[test]
    fn successful_write_passes_through() {
        let run: Result<(), BacktestError> = Err(io_failure("data/SHORT.csv", "truncated"));
        assert!(check_written(Ok(()), &run).is_ok());
    }
}
