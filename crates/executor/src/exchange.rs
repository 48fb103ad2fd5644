use crate::error::ExecutorError;
use crate::portfolio::{Portfolio, PositionSnapshot};
use configuration::Simulation;
use core_types::{ExecutionRecord, Fill, OrderIntent, OrderPrice, OrderSide};
use market_data::{ReplayError, Replayer};
use rust_decimal::Decimal;

/// A generic trait for an execution engine.
///
/// The coordinator calls `refresh_snapshot` once per tick, before any order of
/// that tick reaches `execute`. Implementations validate against that snapshot
/// only and **never modify the portfolio**; the caller books returned fills.
pub trait Executor: Send + Sync {
    fn refresh_snapshot(&mut self, portfolio: &Portfolio);

    /// Processes an `OrderIntent`, returning a `Fill` or `None` when it is rejected.
    fn execute(&mut self, order: &OrderIntent, market: &Replayer) -> Option<Fill>;

    /// The audit log of every executed order so far.
    fn records(&self) -> &[ExecutionRecord];

    fn rejected_orders(&self) -> usize;
}

/// The "virtual exchange" for backtesting.
///
/// Orders execute in full at the latest close (or a limit price bounded by it),
/// in whole lots, with a floored percentage commission.
pub struct SimulatedExecutor {
    params: Simulation,
    snapshot: PositionSnapshot,
    records: Vec<ExecutionRecord>,
    rejected: usize,
}

impl SimulatedExecutor {
    pub fn new(params: Simulation) -> Self {
        Self {
            params,
            snapshot: PositionSnapshot::default(),
            records: Vec::new(),
            rejected: 0,
        }
    }

    /// The intra-tick view of cash and positions used for validation.
    pub fn snapshot(&self) -> &PositionSnapshot {
        &self.snapshot
    }

    /// Keeps a limit price inside what the tick actually traded at: a sell never
    /// prices above the last close and a buy never prices below it.
    fn resolve_price(order: &OrderIntent, side: OrderSide, close: Decimal) -> Decimal {
        match (order.price, side) {
            (OrderPrice::Market, _) => close,
            (OrderPrice::Limit(limit), OrderSide::Sell) if limit > close => {
                tracing::debug!("{}: sell limit {} clamped to close {}", order.symbol, limit, close);
                close
            }
            (OrderPrice::Limit(limit), OrderSide::Buy) if limit < close => {
                tracing::debug!("{}: buy limit {} clamped to close {}", order.symbol, limit, close);
                close
            }
            (OrderPrice::Limit(limit), _) => limit,
        }
    }

    /// `max(round(price * |quantity| * rate, 2), min_commission)`.
    pub fn commission(&self, price: Decimal, quantity: i64) -> Decimal {
        let raw = (price * Decimal::from(quantity.abs()) * self.params.commission_rate).round_dp(2);
        raw.max(self.params.min_commission)
    }

    /// Validates and executes one order against the current snapshot.
    ///
    /// On success the snapshot absorbs the fill and an execution record is kept.
    pub fn try_execute(
        &mut self,
        order: &OrderIntent,
        market: &Replayer,
    ) -> Result<Fill, ExecutorError> {
        let bar = market.latest(&order.symbol).map_err(|e| match e {
            ReplayError::UnknownInstrument(symbol) => ExecutorError::UnknownInstrument(symbol),
            other => ExecutorError::Market(other),
        })?;

        if bar.suspended {
            return Err(ExecutorError::Suspended {
                symbol: order.symbol.clone(),
                date: bar.date,
            });
        }

        if let OrderPrice::Limit(limit) = order.price {
            if limit <= Decimal::ZERO {
                return Err(ExecutorError::InvalidPrice {
                    symbol: order.symbol.clone(),
                    price: limit,
                });
            }
        }

        let lot = self.params.lot_size;
        let quantity_error = || ExecutorError::QuantityError {
            symbol: order.symbol.clone(),
            requested: order.quantity,
            lot: lot.shares(),
        };
        let side = order.side().ok_or_else(quantity_error)?;
        let price = Self::resolve_price(order, side, bar.close);

        let quantity = lot.floor(order.quantity);
        if quantity == 0 {
            return Err(quantity_error());
        }

        let commission = self.commission(price, quantity);
        match side {
            OrderSide::Buy => {
                let required = price * Decimal::from(quantity) + commission;
                if required > self.snapshot.cash {
                    return Err(ExecutorError::InsufficientCash {
                        required,
                        available: self.snapshot.cash,
                    });
                }
            }
            OrderSide::Sell => {
                let available = self.snapshot.position_of(&order.symbol);
                if -quantity > available {
                    return Err(ExecutorError::InsufficientPosition {
                        symbol: order.symbol.clone(),
                        requested: -quantity,
                        available,
                    });
                }
            }
        }

        let fill = Fill {
            symbol: order.symbol.clone(),
            quantity,
            price,
            commission,
        };
        self.snapshot.apply(&fill);
        self.records.push(ExecutionRecord {
            date: bar.date,
            symbol: fill.symbol.clone(),
            price,
            quantity,
            commission,
        });
        Ok(fill)
    }
}

impl Executor for SimulatedExecutor {
    fn refresh_snapshot(&mut self, portfolio: &Portfolio) {
        self.snapshot = portfolio.snapshot();
    }

    fn execute(&mut self, order: &OrderIntent, market: &Replayer) -> Option<Fill> {
        match self.try_execute(order, market) {
            Ok(fill) => {
                tracing::info!(
                    "Filled {:?} {} x{} @ {} (commission {})",
                    fill.side(),
                    fill.symbol,
                    fill.quantity.abs(),
                    fill.price,
                    fill.commission
                );
                Some(fill)
            }
            Err(e) => {
                self.rejected += 1;
                tracing::warn!(reason = e.reason(), "Order rejected: {}", e);
                None
            }
        }
    }

    fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    fn rejected_orders(&self) -> usize {
        self.rejected
    }
}
