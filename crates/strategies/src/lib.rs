//! # barsim Strategy Library
//!
//! This crate contains the trading logic that runs on top of the replay. It defines
//! the `Strategy` capability trait, the `StrategyContext` a strategy trades through,
//! and a reference implementation.
//!
//! ## Architectural Principles
//!
//! - **Read-only market, queued orders:** A strategy never touches the ledger or the
//!   executor. It reads bars and positions through `StrategyContext` and submits
//!   `OrderIntent`s, which the coordinator drains from the event queue in FIFO order.
//! - **Strategy Agnostic Engine:** By using the `Strategy` trait, the `backtester`
//!   can operate on any strategy without knowing its internal details.
//! - **Extensibility:** Adding a new strategy involves creating a new module, implementing
//!   the `Strategy` trait, and adding it to the `StrategyId` enum and `factory`.
//!
//! ## Public API
//!
//! - `Strategy`: The core trait all strategies implement.
//! - `StrategyContext`: Market queries plus the four order helpers.
//! - `StrategyId`: A simple enum to identify which strategy to create.
//! - `create_strategy`: The factory function to construct a strategy instance.
//! - `SmaCrossover`: The moving-average crossover reference strategy.

pub mod context;
pub mod error;
pub mod factory;
pub mod sma_crossover;

pub use context::StrategyContext;
pub use error::StrategyError;
pub use factory::create_strategy;
pub use sma_crossover::SmaCrossover;

pub use core_types::StrategyId;

use events::MarketEvent;
use market_data::Replayer;

/// The core trait that all trading strategies must implement.
///
/// The `&mut self` receivers are crucial, as most strategies keep their own state
/// between ticks. Any error returned from either method aborts the run.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    /// Called once before the first tick, with warm-up history already visible.
    fn initialize(&mut self, market: &Replayer) -> Result<(), StrategyError>;

    /// Called once per tick, after the replayer has appended that tick's bars.
    fn on_tick(
        &mut self,
        event: &MarketEvent,
        ctx: &mut StrategyContext<'_>,
    ) -> Result<(), StrategyError>;
}
