use crate::cursor::Cursor;
use crate::error::ReplayError;
use bar_store::{BarSeries, Universe};
use chrono::NaiveDate;
use core_types::Bar;
use events::MarketEvent;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Replay state for one instrument.
#[derive(Debug)]
struct Feed {
    symbol: String,
    cursor: Cursor,
    /// Date of the instrument's first in-window bar.
    first_date: NaiveDate,
    /// False until the benchmark reaches `first_date`. Until then the instrument is
    /// replayed as suspended placeholder bars.
    admitted: bool,
    /// Warm-up bars followed by every bar replayed so far. Append-only.
    history: Vec<Bar>,
}

impl Feed {
    fn new(series: BarSeries, admitted: bool) -> Self {
        let first_date = series.first_date();
        Self {
            symbol: series.symbol,
            cursor: Cursor::new(series.bars),
            first_date,
            admitted,
            history: series.warmup,
        }
    }
}

/// Advances a synchronized tick across the whole universe, keyed to the benchmark.
///
/// Every tick appends exactly one bar, real or placeholder, to every instrument's
/// history, so all histories grow in lockstep with the benchmark's. Queries only
/// ever see bars that have already been appended.
#[derive(Debug)]
pub struct Replayer {
    /// `feeds[0]` is the benchmark.
    feeds: Vec<Feed>,
    index: HashMap<String, usize>,
    /// Tradable symbols in configuration order.
    symbols: Vec<String>,
    current_date: Option<NaiveDate>,
    ticks: usize,
    finished: bool,
}

impl Replayer {
    pub fn new(universe: Universe) -> Self {
        let Universe {
            benchmark,
            instruments,
            symbols,
            ..
        } = universe;

        let calendar: Vec<NaiveDate> = benchmark.bars.iter().map(|b| b.date).collect();
        let mut feeds = vec![Feed::new(benchmark, true)];
        for series in instruments {
            if calendar.binary_search(&series.first_date()).is_err() {
                tracing::warn!(
                    "{} starts on {}, which is not a benchmark trading day; it will only be replayed as suspended placeholders",
                    series.symbol,
                    series.first_date()
                );
            }
            feeds.push(Feed::new(series, false));
        }

        let index = feeds
            .iter()
            .enumerate()
            .map(|(i, feed)| (feed.symbol.clone(), i))
            .collect();

        Self {
            feeds,
            index,
            symbols,
            current_date: None,
            ticks: 0,
            finished: false,
        }
    }

    /// Moves every instrument forward by one tick.
    ///
    /// Returns `Ok(None)` once the benchmark is exhausted, which ends the replay.
    /// An admitted instrument running out of bars before the benchmark is an
    /// `IntegrityFault`; the replayer is left on the previous tick in that case.
    pub fn advance(&mut self) -> Result<Option<MarketEvent>, ReplayError> {
        if self.finished {
            return Ok(None);
        }
        let Some(date) = self.feeds[0].cursor.peek().map(|b| b.date) else {
            self.finished = true;
            tracing::info!("Benchmark exhausted after {} ticks", self.ticks);
            return Ok(None);
        };

        // Validate before mutating anything so a fault never leaves a half-advanced tick.
        for feed in self.feeds.iter().skip(1) {
            let admitted = feed.admitted || feed.first_date == date;
            if admitted && feed.cursor.is_exhausted() {
                tracing::error!("{} has no bar for {} although it is admitted", feed.symbol, date);
                return Err(ReplayError::IntegrityFault {
                    symbol: feed.symbol.clone(),
                    date,
                });
            }
        }

        for (i, feed) in self.feeds.iter_mut().enumerate() {
            if i > 0 && !feed.admitted && feed.first_date == date {
                feed.admitted = true;
                tracing::debug!("{} admitted on {}", feed.symbol, date);
            }

            let bar = if feed.admitted {
                match feed.cursor.next_bar() {
                    Some(bar) => bar,
                    // Ruled out by the validation pass above.
                    None => Bar::placeholder(&feed.symbol, date),
                }
            } else {
                Bar::placeholder(&feed.symbol, date)
            };

            if bar.date != date {
                tracing::warn!(
                    "{} replayed its {} bar on benchmark date {}; calendars are misaligned",
                    feed.symbol,
                    bar.date,
                    date
                );
            }
            feed.history.push(bar);
        }

        self.ticks += 1;
        self.current_date = Some(date);
        Ok(Some(MarketEvent {
            date,
            tick: self.ticks,
        }))
    }

    fn feed(&self, symbol: &str) -> Result<&Feed, ReplayError> {
        self.index
            .get(symbol)
            .map(|&i| &self.feeds[i])
            .ok_or_else(|| ReplayError::UnknownInstrument(symbol.to_string()))
    }

    /// The most recently appended bar.
    pub fn latest(&self, symbol: &str) -> Result<&Bar, ReplayError> {
        self.feed(symbol)?
            .history
            .last()
            .ok_or_else(|| ReplayError::NoHistory(symbol.to_string()))
    }

    /// The last `n` appended bars, oldest first. Shorter when less history exists.
    pub fn latest_window(&self, symbol: &str, n: usize) -> Result<&[Bar], ReplayError> {
        let history = &self.feed(symbol)?.history;
        let start = history.len().saturating_sub(n);
        Ok(&history[start..])
    }

    pub fn is_suspended(&self, symbol: &str) -> Result<bool, ReplayError> {
        Ok(self.latest(symbol)?.suspended)
    }

    pub fn latest_close(&self, symbol: &str) -> Result<Decimal, ReplayError> {
        Ok(self.latest(symbol)?.close)
    }

    /// Whether the instrument's own bars have started replacing placeholders.
    pub fn is_admitted(&self, symbol: &str) -> Result<bool, ReplayError> {
        Ok(self.feed(symbol)?.admitted)
    }

    pub fn benchmark(&self) -> &str {
        &self.feeds[0].symbol
    }

    /// Tradable symbols, excluding the benchmark unless it was configured as tradable.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// The benchmark date of the current tick, `None` before the first advance.
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current_date
    }

    pub fn tick_count(&self) -> usize {
        self.ticks
    }

    /// Number of ticks the full replay will produce.
    pub fn total_ticks(&self) -> usize {
        self.feeds[0].cursor.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
