//! # barsim Backtester
//!
//! The event coordinator. It owns a `RunContext` and a strategy and drives the
//! replay through a small state machine:
//!
//! - `Running`: advance the replayer. A new tick is first marked to market with
//!   the positions carried over from the previous tick, then one `Market` event is
//!   enqueued and the state moves to `Draining`. An exhausted benchmark moves to
//!   `Terminated`.
//! - `Draining`: pop events in FIFO order. `Market` goes to the strategy, which may
//!   enqueue `Order`s. `Order` goes to the executor, which may enqueue a `Fill`.
//!   `Fill` goes to the ledger. An empty queue returns to `Running`.
//!
//! Fills of a tick therefore show up in the holdings row of the next tick.
//!
//! ## Public API
//!
//! - `Backtester`: Runs a strategy over a `RunContext`.
//! - `RunContext`, `RunState`: The state of one run.
//! - `RunSummary`: The headline numbers of a finished run.
//! - `write_outputs`: Flushes the run's records to disk.

pub mod context;
pub mod error;
pub mod output;

pub use context::{RunContext, RunState};
pub use error::BacktestError;
pub use output::{write_outputs, EXECUTION_RECORDS_FILE, PORTFOLIO_RECORDS_FILE, SUMMARY_FILE};

use events::Event;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use strategies::{Strategy, StrategyContext};
use uuid::Uuid;

/// The headline numbers of a run, also written as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub strategy: String,
    pub ticks: usize,
    pub fills: usize,
    pub rejected_orders: usize,
    pub initial_capital: Decimal,
    pub final_value: Decimal,
    pub pruned: Vec<String>,
}

/// The main backtesting engine.
pub struct Backtester {
    ctx: RunContext,
    strategy: Box<dyn Strategy>,
    progress: Option<ProgressBar>,
    initialized: bool,
}

impl Backtester {
    pub fn new(ctx: RunContext, strategy: Box<dyn Strategy>) -> Self {
        Self {
            ctx,
            strategy,
            progress: None,
            initialized: false,
        }
    }

    /// Shows a progress bar that advances once per tick.
    pub fn with_progress(mut self) -> Result<Self, BacktestError> {
        let progress_bar = ProgressBar::new(self.ctx.market.total_ticks() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("=>-"),
        );
        self.progress = Some(progress_bar);
        Ok(self)
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn state(&self) -> RunState {
        self.ctx.state
    }

    /// Runs the replay to completion.
    ///
    /// On a fatal error the run is terminated and the error returned; everything
    /// recorded up to that point stays available through `context()`.
    pub fn run(&mut self) -> Result<RunSummary, BacktestError> {
        if let Err(e) = self.drive() {
            self.ctx.state = RunState::Terminated;
            if let Some(progress_bar) = &self.progress {
                progress_bar.abandon_with_message("Run aborted.");
            }
            tracing::error!("Run {} aborted after {} ticks: {}", self.ctx.run_id, self.ctx.market.tick_count(), e);
            return Err(e);
        }

        if let Some(progress_bar) = &self.progress {
            progress_bar.finish_with_message("Simulation complete.");
        }
        let summary = self.summary();
        tracing::info!(
            "Run {} finished: {} ticks, {} fills, {} rejected, final value {}",
            summary.run_id,
            summary.ticks,
            summary.fills,
            summary.rejected_orders,
            summary.final_value
        );
        Ok(summary)
    }

    fn drive(&mut self) -> Result<(), BacktestError> {
        if !self.initialized {
            self.strategy.initialize(&self.ctx.market)?;
            self.initialized = true;
        }
        while self.step()? != RunState::Terminated {}
        Ok(())
    }

    /// Performs one transition of the state machine and returns the new state.
    ///
    /// In `Draining` each call delivers exactly one event.
    pub fn step(&mut self) -> Result<RunState, BacktestError> {
        let ctx = &mut self.ctx;
        match ctx.state {
            RunState::Terminated => {}
            RunState::Running => match ctx.market.advance()? {
                Some(event) => {
                    tracing::debug!("Tick {} ({})", event.tick, event.date);
                    // Archived before the strategy sees the tick.
                    ctx.portfolio.mark_to_market(&ctx.market);
                    ctx.queue.push(Event::Market(event));
                    ctx.state = RunState::Draining;
                }
                None => {
                    tracing::info!("Replay exhausted after {} ticks", ctx.market.tick_count());
                    ctx.state = RunState::Terminated;
                }
            },
            RunState::Draining => match ctx.queue.pop() {
                Some(Event::Market(event)) => {
                    // Validation for this tick's orders starts from the ledger as it is now.
                    ctx.executor.refresh_snapshot(&ctx.portfolio);
                    let lot_size = ctx.config.simulation.lot_size;
                    let mut strategy_ctx =
                        StrategyContext::new(&ctx.market, &ctx.portfolio, &mut ctx.queue, lot_size);
                    self.strategy.on_tick(&event, &mut strategy_ctx)?;
                }
                Some(Event::Order(intent)) => {
                    if let Some(fill) = ctx.executor.execute(&intent, &ctx.market) {
                        ctx.queue.push(Event::Fill(fill));
                    }
                }
                Some(Event::Fill(fill)) => {
                    ctx.portfolio.apply_fill(&fill);
                    ctx.fills += 1;
                }
                None => {
                    if let Some(progress_bar) = &self.progress {
                        progress_bar.inc(1);
                    }
                    ctx.state = RunState::Running;
                }
            },
        }
        Ok(ctx.state)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.ctx.run_id,
            strategy: self.strategy.name().to_string(),
            ticks: self.ctx.market.tick_count(),
            fills: self.ctx.fills,
            rejected_orders: self.ctx.executor.rejected_orders(),
            initial_capital: self.ctx.portfolio.initial_capital(),
            final_value: self.ctx.portfolio.total_value(),
            pruned: self.ctx.pruned.clone(),
        }
    }
}
