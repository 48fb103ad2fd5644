use crate::error::StrategyError;
use core_types::{Bar, LotSize, OrderIntent, OrderPrice};
use events::{Event, EventQueue};
use executor::Portfolio;
use market_data::Replayer;
use rust_decimal::Decimal;

/// Everything a strategy may see or do during one `on_tick` callback.
///
/// Reads go straight to the replayer and the ledger; orders are pushed onto the
/// event queue and executed only after the callback returns.
pub struct StrategyContext<'a> {
    market: &'a Replayer,
    portfolio: &'a Portfolio,
    queue: &'a mut EventQueue,
    lot_size: LotSize,
}

impl<'a> StrategyContext<'a> {
    pub fn new(
        market: &'a Replayer,
        portfolio: &'a Portfolio,
        queue: &'a mut EventQueue,
        lot_size: LotSize,
    ) -> Self {
        Self {
            market,
            portfolio,
            queue,
            lot_size,
        }
    }

    pub fn latest(&self, symbol: &str) -> Result<&Bar, StrategyError> {
        Ok(self.market.latest(symbol)?)
    }

    pub fn latest_window(&self, symbol: &str, n: usize) -> Result<&[Bar], StrategyError> {
        Ok(self.market.latest_window(symbol, n)?)
    }

    pub fn is_suspended(&self, symbol: &str) -> Result<bool, StrategyError> {
        Ok(self.market.is_suspended(symbol)?)
    }

    /// Tradable symbols in configuration order.
    pub fn universe(&self) -> &[String] {
        self.market.symbols()
    }

    /// Cash as of the start of this tick.
    ///
    /// Orders submitted earlier in the same callback are not reflected here: they
    /// only reach the ledger once the executor has filled them, after `on_tick`
    /// returns. The executor validates each order against its own running view.
    pub fn available_cash(&self) -> Decimal {
        self.portfolio.available_cash()
    }

    /// Shares held as of the start of this tick. See `available_cash`.
    pub fn position_of(&self, symbol: &str) -> i64 {
        self.portfolio.position_of(symbol)
    }

    /// Buys (positive) or sells (negative) a number of shares.
    pub fn order_shares(
        &mut self,
        symbol: &str,
        shares: i64,
        price: OrderPrice,
    ) -> Result<Option<OrderIntent>, StrategyError> {
        if self.sizing_price(symbol, price)?.is_none() {
            return Ok(None);
        }
        Ok(self.submit(symbol, Decimal::from(shares), price))
    }

    /// Buys (positive) or sells (negative) shares worth `value` at the sizing price.
    pub fn order_value(
        &mut self,
        symbol: &str,
        value: Decimal,
        price: OrderPrice,
    ) -> Result<Option<OrderIntent>, StrategyError> {
        let Some(sizing) = self.sizing_price(symbol, price)? else {
            return Ok(None);
        };
        Ok(self.submit(symbol, value / sizing, price))
    }

    /// Trades the difference between the current position and `target` shares.
    pub fn order_target_shares(
        &mut self,
        symbol: &str,
        target: i64,
        price: OrderPrice,
    ) -> Result<Option<OrderIntent>, StrategyError> {
        if self.sizing_price(symbol, price)?.is_none() {
            return Ok(None);
        }
        let delta = target - self.position_of(symbol);
        Ok(self.submit(symbol, Decimal::from(delta), price))
    }

    /// Trades the difference between the current holding value and `target`.
    ///
    /// The holding is valued at the latest close; the difference is sized at the
    /// order's price.
    pub fn order_target_value(
        &mut self,
        symbol: &str,
        target: Decimal,
        price: OrderPrice,
    ) -> Result<Option<OrderIntent>, StrategyError> {
        let Some(sizing) = self.sizing_price(symbol, price)? else {
            return Ok(None);
        };
        let close = self.market.latest_close(symbol)?;
        let held = close * Decimal::from(self.position_of(symbol));
        Ok(self.submit(symbol, (target - held) / sizing, price))
    }

    /// The price used to turn values into share counts, or `None` when the
    /// instrument has no usable price (e.g. a placeholder bar).
    fn sizing_price(&self, symbol: &str, price: OrderPrice) -> Result<Option<Decimal>, StrategyError> {
        let sizing = price.resolve(self.market.latest_close(symbol)?);
        if sizing <= Decimal::ZERO {
            tracing::debug!("{}: no usable price to size an order, skipping", symbol);
            return Ok(None);
        }
        Ok(Some(sizing))
    }

    fn submit(&mut self, symbol: &str, quantity: Decimal, price: OrderPrice) -> Option<OrderIntent> {
        let shares = self.lot_size.floor(quantity);
        if shares == 0 {
            tracing::debug!("{}: {} shares is below one lot, skipping", symbol, quantity);
            return None;
        }
        let intent = OrderIntent::new(symbol, Decimal::from(shares), price);
        self.queue.push(Event::Order(intent.clone()));
        Some(intent)
    }
}
