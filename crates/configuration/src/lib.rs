use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Backtest, Config, Simulation, SmaCrossoverParams, Strategies};

/// Environment variables prefixed with this override file values,
/// e.g. `BARSIM_BACKTEST__INITIAL_CAPITAL=500000`.
pub const ENV_PREFIX: &str = "BARSIM";

/// Loads the run configuration from a TOML file.
///
/// The file is layered with `BARSIM_*` environment overrides, deserialized into the
/// strongly-typed `Config` struct, and validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("backtest.symbols")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_full_file() {
        let file = write_config(
            r#"
            [backtest]
            symbols = ["600030.SH", "000001.SZ"]
            benchmark = "399300.SZ"
            start_date = "2018-01-01"
            end_date = "2020-05-01"
            initial_capital = 1000000
            data_dir = "data/sym_data"
            output_dir = "output"

            [simulation]
            commission_rate = 0.0003
            min_commission = 5
            lot_size = 100

            [strategies.sma_crossover]
            fast_period = 5
            slow_period = 20
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.backtest.symbols, vec!["600030.SH", "000001.SZ"]);
        assert_eq!(config.backtest.benchmark, "399300.SZ");
        assert_eq!(
            config.backtest.start_date,
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
        );
        assert_eq!(config.backtest.initial_capital, dec!(1000000));
        assert_eq!(config.simulation.commission_rate, dec!(0.0003));
        assert_eq!(config.simulation.min_commission, dec!(5));
        assert_eq!(config.simulation.lot_size.shares(), 100);
        assert_eq!(config.strategies.sma_crossover.fast_period, 5);
    }

    #[test]
    fn simulation_and_strategy_sections_are_optional() {
        let file = write_config(
            r#"
            [backtest]
            symbols = ["600030.SH"]
            benchmark = "399300.SZ"
            start_date = "2018-01-01"
            end_date = "2018-12-31"
            initial_capital = 1000000
            data_dir = "data"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.simulation.commission_rate, dec!(0.0003));
        assert_eq!(config.simulation.min_commission, dec!(5));
        assert_eq!(config.simulation.lot_size.shares(), 100);
        assert_eq!(config.strategies.sma_crossover.fast_period, 10);
        assert_eq!(config.strategies.sma_crossover.slow_period, 30);
        assert_eq!(config.backtest.output_dir.to_str(), Some("output"));
    }

    #[test]
    fn rejects_inverted_window() {
        let file = write_config(
            r#"
            [backtest]
            symbols = []
            benchmark = "399300.SZ"
            start_date = "2020-01-01"
            end_date = "2019-01-01"
            initial_capital = 1000000
            data_dir = "data"
            "#,
        );

        match load_config(file.path()) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("start_date")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
