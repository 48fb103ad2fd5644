use crate::context::StrategyContext;
use crate::error::StrategyError;
use crate::Strategy;
use configuration::SmaCrossoverParams;
use core_types::{Bar, OrderPrice};
use events::MarketEvent;
use market_data::Replayer;
use rust_decimal::Decimal;

/// The moving-average crossover strategy.
///
/// Holds an instrument while its fast mean close is above its slow mean close.
/// Each tick it first exits every held instrument whose fast mean has dropped below
/// the slow one, then splits the available cash equally across every flat instrument
/// whose fast mean is above the slow one. Suspended instruments are left alone.
pub struct SmaCrossover {
    fast_period: usize,
    slow_period: usize,
}

impl SmaCrossover {
    /// Creates a new `SmaCrossover` instance with the given parameters.
    ///
    /// It performs validation to ensure the parameters are logical.
    pub fn new(params: SmaCrossoverParams) -> Result<Self, StrategyError> {
        if params.fast_period == 0 {
            return Err(StrategyError::InvalidParameters(
                "Fast MA period must be positive".to_string(),
            ));
        }
        if params.fast_period >= params.slow_period {
            return Err(StrategyError::InvalidParameters(
                "Fast MA period must be less than Slow MA period".to_string(),
            ));
        }
        Ok(Self {
            fast_period: params.fast_period,
            slow_period: params.slow_period,
        })
    }

    fn mean_close(window: &[Bar]) -> Option<Decimal> {
        if window.is_empty() {
            return None;
        }
        let total: Decimal = window.iter().map(|b| b.close).sum();
        Some(total / Decimal::from(window.len()))
    }

    /// `(fast, slow)` means, or `None` until a full slow window of real bars exists.
    fn averages(&self, ctx: &StrategyContext<'_>, symbol: &str) -> Result<Option<(Decimal, Decimal)>, StrategyError> {
        let slow_window = ctx.latest_window(symbol, self.slow_period)?;
        // Placeholder bars close at zero and would drag the means down.
        if slow_window.len() < self.slow_period || slow_window.iter().any(|b| b.close.is_zero()) {
            return Ok(None);
        }
        let fast_window = &slow_window[slow_window.len() - self.fast_period..];
        Ok(Self::mean_close(fast_window).zip(Self::mean_close(slow_window)))
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        "sma_crossover"
    }

    fn initialize(&mut self, market: &Replayer) -> Result<(), StrategyError> {
        for symbol in market.symbols() {
            let warmup = market.latest_window(symbol, self.slow_period)?.len();
            if warmup < self.slow_period {
                tracing::info!(
                    "{} has {} of {} warm-up bars; signals start once the slow window fills",
                    symbol,
                    warmup,
                    self.slow_period
                );
            }
        }
        tracing::info!(
            "SmaCrossover initialized (fast {}, slow {}) over {} instruments",
            self.fast_period,
            self.slow_period,
            market.symbols().len()
        );
        Ok(())
    }

    fn on_tick(
        &mut self,
        event: &MarketEvent,
        ctx: &mut StrategyContext<'_>,
    ) -> Result<(), StrategyError> {
        let mut buys = Vec::new();
        let mut sells = Vec::new();

        for symbol in ctx.universe() {
            if ctx.is_suspended(symbol)? {
                continue;
            }
            let Some((fast, slow)) = self.averages(ctx, symbol)? else {
                continue;
            };
            let position = ctx.position_of(symbol);
            if fast > slow && position == 0 {
                tracing::debug!("[{}] buy signal for {}: fast {} > slow {}", event.date, symbol, fast, slow);
                buys.push(symbol.clone());
            } else if fast < slow && position != 0 {
                tracing::debug!("[{}] sell signal for {}: fast {} < slow {}", event.date, symbol, fast, slow);
                sells.push(symbol.clone());
            }
        }

        for symbol in &sells {
            ctx.order_target_shares(symbol, 0, OrderPrice::Market)?;
        }

        if !buys.is_empty() {
            let slice = ctx.available_cash() / Decimal::from(buys.len());
            for symbol in &buys {
                ctx.order_target_value(symbol, slice, OrderPrice::Market)?;
            }
        }
        Ok(())
    }
}
