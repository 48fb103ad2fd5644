//! # barsim Executor Crate
//!
//! This crate provides the components for trade execution and account state
//! management. It defines an `Executor` trait with a `SimulatedExecutor` for
//! backtesting, and a `Portfolio` ledger that tracks cash and share positions.
//!
//! ## Architectural Principles
//!
//! - **State vs. Logic Decoupling:** The `Executor` never touches the `Portfolio`.
//!   It validates orders against a private `PositionSnapshot` copied from the ledger
//!   at the start of each tick and returns `Fill`s. The `Portfolio` is the only state
//!   machine for the account and changes solely through `apply_fill`.
//! - **Value Snapshots:** `PositionSnapshot` owns its data. Refreshing it copies the
//!   ledger, so bookkeeping inside one tick can never leak back into the ledger.
//!
//! ## Public API
//!
//! - `Executor`: The core trait for execution engines.
//! - `SimulatedExecutor`: The "virtual exchange" for backtesting.
//! - `Portfolio`: The in-memory ledger for the simulated account.
//! - `ExecutorError`: Why an order was rejected.

pub mod error;
pub mod exchange;
pub mod portfolio;

pub use error::ExecutorError;
pub use exchange::{Executor, SimulatedExecutor};
pub use portfolio::{HoldingsSnapshot, Portfolio, PositionSnapshot};
