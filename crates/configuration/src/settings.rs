use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::LotSize;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for a backtest run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backtest: Backtest,
    #[serde(default)]
    pub simulation: Simulation,
    #[serde(default)]
    pub strategies: Strategies,
}

/// Contains parameters for a single backtest run.
#[derive(Debug, Clone, Deserialize)]
pub struct Backtest {
    /// The tradable universe before any pruning (e.g., ["600030.SH", "000001.SZ"]).
    pub symbols: Vec<String>,
    /// The instrument whose trading calendar drives the replay (e.g., "399300.SZ").
    pub benchmark: String,
    /// First date of the replay window, inclusive.
    pub start_date: NaiveDate,
    /// Last date of the replay window, inclusive.
    pub end_date: NaiveDate,
    /// The initial starting capital for the simulation.
    pub initial_capital: Decimal,
    /// Directory holding one `<symbol>.csv` file per instrument.
    pub data_dir: PathBuf,
    /// Directory the run records and diagnostic log are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Contains parameters for the execution simulator.
#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    /// Commission charged on traded notional. 0.0003 corresponds to 0.03%.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Decimal,
    /// Floor applied to every commission charge.
    #[serde(default = "default_min_commission")]
    pub min_commission: Decimal,
    /// Shares per board lot.
    #[serde(default)]
    pub lot_size: LotSize,
}

/// Contains the parameter sets for all available strategies.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Strategies {
    #[serde(default)]
    pub sma_crossover: SmaCrossoverParams,
}

/// Parameters for the moving-average crossover strategy.
#[derive(Debug, Deserialize, Clone)]
pub struct SmaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_commission_rate() -> Decimal {
    dec!(0.0003)
}

fn default_min_commission() -> Decimal {
    dec!(5)
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            min_commission: default_min_commission(),
            lot_size: LotSize::default(),
        }
    }
}

impl Default for SmaCrossoverParams {
    fn default() -> Self {
        Self {
            fast_period: 10,
            slow_period: 30,
        }
    }
}

impl Config {
    /// Checks the cross-field rules that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bt = &self.backtest;
        if bt.benchmark.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "benchmark must not be empty".to_string(),
            ));
        }
        if bt.start_date > bt.end_date {
            return Err(ConfigError::ValidationError(format!(
                "start_date {} is after end_date {}",
                bt.start_date, bt.end_date
            )));
        }
        if bt.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "initial_capital must be greater than 0".to_string(),
            ));
        }

        let sim = &self.simulation;
        if sim.commission_rate.is_sign_negative() {
            return Err(ConfigError::ValidationError(
                "commission_rate must not be negative".to_string(),
            ));
        }
        if sim.min_commission.is_sign_negative() {
            return Err(ConfigError::ValidationError(
                "min_commission must not be negative".to_string(),
            ));
        }

        let sma = &self.strategies.sma_crossover;
        if sma.fast_period == 0 || sma.fast_period >= sma.slow_period {
            return Err(ConfigError::ValidationError(format!(
                "sma_crossover periods must satisfy 0 < fast ({}) < slow ({})",
                sma.fast_period, sma.slow_period
            )));
        }

        Ok(())
    }

    /// The benchmark followed by every distinct tradable symbol, in configuration order.
    pub fn full_symbol_list(&self) -> Vec<String> {
        let mut list = vec![self.backtest.benchmark.clone()];
        for symbol in &self.backtest.symbols {
            if !list.contains(symbol) {
                list.push(symbol.clone());
            }
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            backtest: Backtest {
                symbols: vec!["A".into(), "B".into(), "A".into(), "IDX".into()],
                benchmark: "IDX".into(),
                start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
                initial_capital: dec!(1000000),
                data_dir: PathBuf::from("data"),
                output_dir: default_output_dir(),
            },
            simulation: Simulation::default(),
            strategies: Strategies::default(),
        }
    }

    #[test]
    fn full_symbol_list_dedups_and_leads_with_benchmark() {
        assert_eq!(sample().full_symbol_list(), vec!["IDX", "A", "B"]);
    }

    #[test]
    fn sample_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_bad_sma_periods() {
        let mut config = sample();
        config.strategies.sma_crossover = SmaCrossoverParams {
            fast_period: 30,
            slow_period: 10,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_capital() {
        let mut config = sample();
        config.backtest.initial_capital = Decimal::ZERO;
        assert!(config.validate().is_err());
    }
}
