use chrono::NaiveDate;
use core_types::{Fill, OrderIntent};
use serde::{Deserialize, Serialize};

/// Announces that the replayer has advanced to a new tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// The benchmark's trading date for this tick.
    pub date: NaiveDate,
    /// 1-based tick number.
    pub tick: usize,
}

/// The envelope for everything that flows through the event queue.
///
/// `Market` is produced by the replayer and consumed by the strategy, `Order` is
/// produced by the strategy and consumed by the executor, and `Fill` is produced by
/// the executor and consumed by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    Market(MarketEvent),
    Order(OrderIntent),
    Fill(Fill),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Market(_) => "market",
            Event::Order(_) => "order",
            Event::Fill(_) => "fill",
        }
    }
}
