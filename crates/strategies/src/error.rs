use market_data::ReplayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Market data query failed: {0}")]
    Market(#[from] ReplayError),
}
