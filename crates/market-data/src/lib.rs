//! # barsim Market Data
//!
//! Replays the loaded universe one tick at a time, anchored to the benchmark's
//! trading calendar, and answers the windowed queries strategies and the executor
//! make against the bars replayed so far.

pub mod cursor;
pub mod error;
pub mod replayer;

pub use cursor::Cursor;
pub use error::ReplayError;
pub use replayer::Replayer;
