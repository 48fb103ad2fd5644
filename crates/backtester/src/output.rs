use crate::context::RunContext;
use crate::error::BacktestError;
use crate::RunSummary;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

pub const PORTFOLIO_RECORDS_FILE: &str = "portfolio_records.csv";
pub const EXECUTION_RECORDS_FILE: &str = "execution_records.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Writes the per-tick holdings, the execution audit log and the summary into `dir`.
///
/// Safe to call after a failed run: whatever history exists is written.
pub fn write_outputs(dir: &Path, ctx: &RunContext, summary: &RunSummary) -> Result<(), BacktestError> {
    fs::create_dir_all(dir).map_err(|source| BacktestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_portfolio_records(&dir.join(PORTFOLIO_RECORDS_FILE), ctx)?;
    write_execution_records(&dir.join(EXECUTION_RECORDS_FILE), ctx)?;

    let summary_path = dir.join(SUMMARY_FILE);
    let file = File::create(&summary_path).map_err(|source| BacktestError::Io {
        path: summary_path.clone(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;

    tracing::info!("Run records written to {}", dir.display());
    Ok(())
}

/// `date_time, cash, pos_<SYM>..., mkv_<SYM>..., total_value`, one row per tick.
fn write_portfolio_records(path: &Path, ctx: &RunContext) -> Result<(), BacktestError> {
    let symbols = ctx.portfolio.symbols();
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["date_time".to_string(), "cash".to_string()];
    header.extend(symbols.iter().map(|s| format!("pos_{s}")));
    header.extend(symbols.iter().map(|s| format!("mkv_{s}")));
    header.push("total_value".to_string());
    writer.write_record(&header)?;

    for snapshot in ctx.portfolio.history() {
        let mut row = vec![snapshot.date.to_string(), snapshot.cash.to_string()];
        row.extend(
            symbols
                .iter()
                .map(|s| snapshot.positions.get(s).copied().unwrap_or(0).to_string()),
        );
        row.extend(symbols.iter().map(|s| {
            snapshot
                .market_values
                .get(s)
                .map_or_else(|| "0".to_string(), |v| v.to_string())
        }));
        row.push(snapshot.total_value.to_string());
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|source| BacktestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn write_execution_records(path: &Path, ctx: &RunContext) -> Result<(), BacktestError> {
    let mut writer = csv::Writer::from_path(path)?;
    let records = ctx.executor.records();
    if records.is_empty() {
        // serde only emits headers alongside the first record.
        writer.write_record(["date_time", "symbol", "order_price", "order_amount", "commission"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| BacktestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
