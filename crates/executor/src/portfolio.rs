use chrono::NaiveDate;
use core_types::Fill;
use market_data::Replayer;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A by-value copy of the ledger's cash and positions.
///
/// Owning its maps means a snapshot can be mutated freely without touching the
/// `Portfolio` it was taken from, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionSnapshot {
    pub cash: Decimal,
    pub positions: BTreeMap<String, i64>,
}

impl PositionSnapshot {
    pub fn position_of(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    /// Applies the same cash and position delta the ledger will apply for `fill`.
    pub fn apply(&mut self, fill: &Fill) {
        self.cash += fill.cash_delta();
        *self.positions.entry(fill.symbol.clone()).or_insert(0) += fill.quantity;
    }
}

/// The account state at the close of one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingsSnapshot {
    pub date: NaiveDate,
    pub cash: Decimal,
    pub positions: BTreeMap<String, i64>,
    /// `position * latest close` per instrument.
    pub market_values: BTreeMap<String, Decimal>,
    /// Cash plus the sum of all market values.
    pub total_value: Decimal,
}

/// Manages the state of the simulated account: cash and whole-share positions.
///
/// Its sole responsibility is to accumulate fills. It never validates them; that
/// is the executor's job.
#[derive(Debug, Clone)]
pub struct Portfolio {
    initial_capital: Decimal,
    cash: Decimal,
    positions: BTreeMap<String, i64>,
    /// Instruments in universe order, followed by any first seen through a fill.
    symbols: Vec<String>,
    history: Vec<HoldingsSnapshot>,
}

impl Portfolio {
    /// Creates a flat `Portfolio` holding `initial_capital` in cash and a zero
    /// position for every symbol.
    pub fn new(initial_capital: Decimal, symbols: &[String]) -> Self {
        let mut portfolio = Self {
            initial_capital,
            cash: initial_capital,
            positions: BTreeMap::new(),
            symbols: Vec::with_capacity(symbols.len()),
            history: Vec::new(),
        };
        for symbol in symbols {
            portfolio.track(symbol);
        }
        portfolio
    }

    fn track(&mut self, symbol: &str) {
        if !self.positions.contains_key(symbol) {
            self.positions.insert(symbol.to_string(), 0);
            self.symbols.push(symbol.to_string());
        }
    }

    /// Books a fill: `cash -= price * quantity + commission`, `position += quantity`.
    pub fn apply_fill(&mut self, fill: &Fill) {
        self.track(&fill.symbol);
        self.cash += fill.cash_delta();
        if let Some(position) = self.positions.get_mut(&fill.symbol) {
            *position += fill.quantity;
        }
        tracing::debug!(
            "Ledger applied {} {} @ {}; cash now {}",
            fill.quantity,
            fill.symbol,
            fill.price,
            self.cash
        );
    }

    /// Values every position at the replayer's latest close and archives the result.
    ///
    /// An instrument the replayer cannot price keeps its previous market value.
    /// Returns `None` before the replayer has produced its first tick.
    pub fn mark_to_market(&mut self, market: &Replayer) -> Option<&HoldingsSnapshot> {
        let date = market.current_date()?;
        let previous = self.history.last();

        let mut market_values = BTreeMap::new();
        let mut total_value = self.cash;
        for symbol in &self.symbols {
            let position = self.positions.get(symbol).copied().unwrap_or(0);
            let value = match market.latest_close(symbol) {
                Ok(close) => close * Decimal::from(position),
                Err(e) => {
                    tracing::warn!("Cannot price {} on {}: {}; keeping its last value", symbol, date, e);
                    previous
                        .and_then(|s| s.market_values.get(symbol).copied())
                        .unwrap_or(Decimal::ZERO)
                }
            };
            total_value += value;
            market_values.insert(symbol.clone(), value);
        }

        self.history.push(HoldingsSnapshot {
            date,
            cash: self.cash,
            positions: self.positions.clone(),
            market_values,
            total_value,
        });
        self.history.last()
    }

    pub fn available_cash(&self) -> Decimal {
        self.cash
    }

    pub fn position_of(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    /// A deep copy of cash and positions.
    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            cash: self.cash,
            positions: self.positions.clone(),
        }
    }

    /// Market value of `symbol` as of the latest archived snapshot.
    pub fn holding_value(&self, symbol: &str) -> Decimal {
        self.history
            .last()
            .and_then(|s| s.market_values.get(symbol).copied())
            .unwrap_or(Decimal::ZERO)
    }

    /// Total value as of the latest snapshot, or the initial capital before any.
    pub fn total_value(&self) -> Decimal {
        self.history
            .last()
            .map_or(self.initial_capital, |s| s.total_value)
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn history(&self) -> &[HoldingsSnapshot] {
        &self.history
    }
}
