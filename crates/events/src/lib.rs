//! # barsim Events
//!
//! The event envelope passed between the replayer, the strategy, the executor and
//! the ledger, plus the FIFO queue that carries it.
//!
//! As a Layer 0 crate, it depends only on `core-types`. Events carry no ordering key:
//! their order is their position in the queue.

// Declare the modules that make up this crate.
pub mod messages;
pub mod queue;

// Re-export the core types to provide a clean public API.
pub use messages::{Event, MarketEvent};
pub use queue::EventQueue;
