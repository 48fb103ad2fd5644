use chrono::NaiveDate;
use market_data::ReplayError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons an order is rejected. None of them are fatal to a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("{0} is not part of the replayed universe")]
    UnknownInstrument(String),

    #[error("{symbol} is suspended on {date}")]
    Suspended { symbol: String, date: NaiveDate },

    #[error("{symbol}: limit price {price} is not positive")]
    InvalidPrice { symbol: String, price: Decimal },

    #[error("{symbol}: requested {requested} shares is less than one lot of {lot}")]
    QuantityError {
        symbol: String,
        requested: Decimal,
        lot: i64,
    },

    #[error("Not enough cash available to execute trade. Required: {required}, Available: {available}")]
    InsufficientCash { required: Decimal, available: Decimal },

    #[error("Not enough {symbol} shares to sell. Requested: {requested}, Available: {available}")]
    InsufficientPosition {
        symbol: String,
        requested: i64,
        available: i64,
    },

    #[error("Market data error: {0}")]
    Market(#[from] ReplayError),
}

impl ExecutorError {
    /// Short tag used in rejection logs.
    pub fn reason(&self) -> &'static str {
        match self {
            ExecutorError::UnknownInstrument(_) => "unknown instrument",
            ExecutorError::Suspended { .. } => "suspended",
            ExecutorError::InvalidPrice { .. } => "price error",
            ExecutorError::QuantityError { .. } => "quantity error",
            ExecutorError::InsufficientCash { .. } => "cash error",
            ExecutorError::InsufficientPosition { .. } => "position error",
            ExecutorError::Market(_) => "market data",
        }
    }
}
