use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The minimum tradable unit. Every executed quantity is a whole multiple of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct LotSize(i64);

impl LotSize {
    /// A-share board lot.
    pub const STANDARD: LotSize = LotSize(100);

    pub fn new(shares: i64) -> Result<Self, CoreError> {
        if shares <= 0 {
            return Err(CoreError::InvalidInput(
                "lot size".to_string(),
                format!("{shares} must be positive"),
            ));
        }
        Ok(Self(shares))
    }

    pub fn shares(&self) -> i64 {
        self.0
    }

    /// Truncates a signed quantity toward zero onto a whole number of lots.
    ///
    /// Quantities too large to fit an `i64` floor to zero, which callers treat
    /// as an unusable quantity.
    pub fn floor(&self, quantity: Decimal) -> i64 {
        let lot = Decimal::from(self.0);
        (quantity / lot)
            .trunc()
            .to_i64()
            .and_then(|lots| lots.checked_mul(self.0))
            .unwrap_or(0)
    }

    pub fn is_multiple(&self, shares: i64) -> bool {
        shares % self.0 == 0
    }
}

impl Default for LotSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<i64> for LotSize {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LotSize> for i64 {
    fn from(value: LotSize) -> Self {
        value.0
    }
}
