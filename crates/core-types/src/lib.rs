//! # barsim core types
//!
//! Layer 0 of the workspace: the plain data structures every other crate speaks.
//! Nothing in here has behaviour beyond construction and a few derived views.

pub mod enums;
pub mod error;
pub mod lot;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderPrice, OrderSide, StrategyId};
pub use error::CoreError;
pub use lot::LotSize;
pub use structs::{Bar, ExecutionRecord, Fill, OrderIntent};
