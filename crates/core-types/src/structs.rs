use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{OrderPrice, OrderSide};

/// One trading day of one instrument. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub symbol: String,
    pub name: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub change: Decimal,
    pub pct_change: Decimal,
    pub volume: Decimal,
    pub turnover: Decimal,
    pub suspended: bool,
}

impl Bar {
    /// A stand-in for an instrument that has not started trading yet.
    ///
    /// All prices and volumes are zero and the bar is flagged as suspended, so
    /// nothing can execute against it.
    pub fn placeholder(symbol: &str, date: NaiveDate) -> Self {
        Self {
            date,
            symbol: symbol.to_string(),
            name: "Unknown".to_string(),
            open: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            close: Decimal::ZERO,
            change: Decimal::ZERO,
            pct_change: Decimal::ZERO,
            volume: Decimal::ZERO,
            turnover: Decimal::ZERO,
            suspended: true,
        }
    }
}

/// A strategy's request to trade. Created during a tick, consumed once by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    /// Signed share quantity: positive buys, negative sells. May be fractional when
    /// derived from a value; the executor floors it to whole lots.
    pub quantity: Decimal,
    pub price: OrderPrice,
}

impl OrderIntent {
    pub fn new(symbol: impl Into<String>, quantity: Decimal, price: OrderPrice) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
        }
    }

    /// `None` for a zero quantity.
    pub fn side(&self) -> Option<OrderSide> {
        if self.quantity > Decimal::ZERO {
            Some(OrderSide::Buy)
        } else if self.quantity < Decimal::ZERO {
            Some(OrderSide::Sell)
        } else {
            None
        }
    }
}

/// An executed order. The only thing that mutates the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    /// Signed executed shares, always a whole number of lots.
    pub quantity: i64,
    pub price: Decimal,
    pub commission: Decimal,
}

impl Fill {
    /// The change to cash this fill causes: `-(price * quantity + commission)`.
    pub fn cash_delta(&self) -> Decimal {
        -(self.price * Decimal::from(self.quantity) + self.commission)
    }

    pub fn side(&self) -> OrderSide {
        if self.quantity >= 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

/// One row of the execution audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(rename = "date_time")]
    pub date: NaiveDate,
    pub symbol: String,
    #[serde(rename = "order_price")]
    pub price: Decimal,
    #[serde(rename = "order_amount")]
    pub quantity: i64,
    pub commission: Decimal,
}
