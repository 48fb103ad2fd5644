use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side of the order
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// The price instruction attached to an order intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderPrice {
    /// Execute at the instrument's last close.
    Market,
    /// Execute at this price, clamped to the last close on the unfavourable side.
    Limit(Decimal),
}

impl OrderPrice {
    /// Builds a limit price, rejecting zero and negative values.
    pub fn limit(price: Decimal) -> Result<Self, CoreError> {
        if price <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "limit price".to_string(),
                format!("{price} must be positive"),
            ));
        }
        Ok(OrderPrice::Limit(price))
    }

    /// Resolves the price against the last close: a market order takes the close,
    /// a limit order keeps its own price.
    pub fn resolve(&self, last_close: Decimal) -> Decimal {
        match self {
            OrderPrice::Market => last_close,
            OrderPrice::Limit(price) => *price,
        }
    }
}

/// Identifies which strategy implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    SmaCrossover,
}
