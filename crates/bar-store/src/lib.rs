//! # barsim Bar Store
//!
//! Loads and indexes per-instrument daily bar histories from CSV files.
//!
//! ## Architectural Principles
//!
//! - **Pure data:** the store only reads and splits bars. It knows nothing about
//!   ticks, cursors or portfolios.
//! - **Load once:** the whole universe is read before the replay starts. Instruments
//!   whose data is missing are pruned at that point and the universe is immutable
//!   afterwards. A missing benchmark is fatal.
//!
//! ## Public API
//!
//! - `BarRepository`: reads `<data_dir>/<symbol>.csv` and splits it into the replay
//!   window and the warm-up history before it.
//! - `BarSeries`: one instrument's bars.
//! - `Universe`: the benchmark plus every tradable instrument that survived loading.
//! - `BarStoreError`: the specific error types that can be returned from this crate.

pub mod error;
mod record;
pub mod repository;
pub mod universe;

pub use error::BarStoreError;
pub use repository::{BarRepository, BarSeries};
pub use universe::Universe;
