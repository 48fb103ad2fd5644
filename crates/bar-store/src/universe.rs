use crate::error::BarStoreError;
use crate::repository::{BarRepository, BarSeries};

/// The instruments a run replays, fixed before the first tick.
#[derive(Debug, Clone)]
pub struct Universe {
    /// The series whose dates define the ticks.
    pub benchmark: BarSeries,
    /// Tradable instruments other than the benchmark, in configuration order.
    pub instruments: Vec<BarSeries>,
    /// Tradable symbols in configuration order. Includes the benchmark when it was
    /// configured as tradable.
    pub symbols: Vec<String>,
    /// Configured symbols that were dropped because their data was unavailable.
    pub pruned: Vec<String>,
}

impl Universe {
    pub fn benchmark_symbol(&self) -> &str {
        &self.benchmark.symbol
    }
}

impl BarRepository {
    /// Loads the benchmark and every configured instrument.
    ///
    /// A benchmark that cannot be loaded aborts the whole run. Any other instrument
    /// that cannot be loaded is logged and left out of the universe.
    pub fn load_universe(
        &self,
        benchmark: &str,
        symbols: &[String],
    ) -> Result<Universe, BarStoreError> {
        let benchmark_series = self.load(benchmark).inspect_err(|e| {
            tracing::error!("Benchmark {} is unavailable, the backtest cannot start: {}", benchmark, e);
        })?;

        let mut instruments: Vec<BarSeries> = Vec::new();
        let mut tradable: Vec<String> = Vec::new();
        let mut pruned: Vec<String> = Vec::new();

        for symbol in symbols {
            if tradable.contains(symbol) || pruned.contains(symbol) {
                continue;
            }
            if symbol == benchmark {
                tradable.push(symbol.clone());
                continue;
            }
            match self.load(symbol) {
                Ok(series) => {
                    tradable.push(symbol.clone());
                    instruments.push(series);
                }
                Err(e) => {
                    tracing::warn!("Dropping {} from the universe: {}", symbol, e);
                    pruned.push(symbol.clone());
                }
            }
        }

        tracing::info!(
            benchmark,
            tradable = tradable.len(),
            pruned = pruned.len(),
            "Universe loaded"
        );

        Ok(Universe {
            benchmark: benchmark_series,
            instruments,
            symbols: tradable,
            pruned,
        })
    }
}
