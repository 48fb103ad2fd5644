use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarStoreError {
    #[error("{symbol} is not available in the historical data set: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("Failed to read bar file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl BarStoreError {
    pub(crate) fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        BarStoreError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}
