use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("{0} is not available in the historical data set")]
    UnknownInstrument(String),

    #[error("No bars have been replayed for {0} yet")]
    NoHistory(String),

    #[error("Integrity fault: {symbol} ran out of bars before the benchmark on {date}")]
    IntegrityFault { symbol: String, date: NaiveDate },
}
