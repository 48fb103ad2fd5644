use crate::error::BacktestError;
use bar_store::{BarRepository, Universe};
use configuration::Config;
use events::EventQueue;
use executor::{Executor, Portfolio, SimulatedExecutor};
use market_data::Replayer;
use uuid::Uuid;

/// Where the coordinator's state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting to advance the replayer.
    Running,
    /// Delivering queued events for the current tick.
    Draining,
    /// The replay is over, cleanly or not.
    Terminated,
}

/// All mutable state of one backtest run.
///
/// Components receive what they need from here by reference; nothing about a run
/// lives outside this struct.
pub struct RunContext {
    pub run_id: Uuid,
    pub config: Config,
    pub market: Replayer,
    pub portfolio: Portfolio,
    pub executor: Box<dyn Executor>,
    pub queue: EventQueue,
    pub state: RunState,
    /// Configured instruments dropped for lack of data.
    pub pruned: Vec<String>,
    pub fills: usize,
}

impl RunContext {
    /// Loads the configured universe from disk and builds a run around it.
    pub fn load(config: Config) -> Result<Self, BacktestError> {
        let backtest = &config.backtest;
        let repo = BarRepository::new(&backtest.data_dir, backtest.start_date, backtest.end_date);
        let universe = repo
            .load_universe(&backtest.benchmark, &backtest.symbols)
            .map_err(|source| BacktestError::BenchmarkUnavailable {
                symbol: backtest.benchmark.clone(),
                source,
            })?;
        Ok(Self::new(config, universe))
    }

    /// Builds a run with the simulated executor configured in `[simulation]`.
    pub fn new(config: Config, universe: Universe) -> Self {
        let executor = Box::new(SimulatedExecutor::new(config.simulation.clone()));
        Self::with_executor(config, universe, executor)
    }

    pub fn with_executor(config: Config, universe: Universe, executor: Box<dyn Executor>) -> Self {
        let run_id = Uuid::new_v4();
        let pruned = universe.pruned.clone();
        let market = Replayer::new(universe);
        let portfolio = Portfolio::new(config.backtest.initial_capital, market.symbols());
        tracing::info!(
            "Run {} prepared: {} instruments over {} ticks, {} pruned",
            run_id,
            market.symbols().len(),
            market.total_ticks(),
            pruned.len()
        );
        Self {
            run_id,
            config,
            market,
            portfolio,
            executor,
            queue: EventQueue::new(),
            state: RunState::Running,
            pruned,
            fills: 0,
        }
    }
}
