use bar_store::BarStoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Benchmark {symbol} is unavailable: {source}")]
    BenchmarkUnavailable {
        symbol: String,
        #[source]
        source: BarStoreError,
    },

    #[error("Market replay error: {0}")]
    Replay(#[from] market_data::ReplayError),

    #[error("Strategy execution error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write run records: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write run summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<indicatif::style::TemplateError> for BacktestError {
    fn from(error: indicatif::style::TemplateError) -> Self {
        BacktestError::ProgressBarTemplate(error.to_string())
    }
}
