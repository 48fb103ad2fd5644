#![allow(dead_code)]

use bar_store::{BarSeries, Universe};
use chrono::{Days, NaiveDate};
use core_types::Bar;
use market_data::Replayer;
use rust_decimal::Decimal;

pub fn day(i: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 1)
        .unwrap()
        .checked_add_days(Days::new(i))
        .unwrap()
}

pub fn bar(symbol: &str, i: u64, close: Decimal, suspended: bool) -> Bar {
    Bar {
        name: symbol.to_string(),
        open: close,
        high: close,
        low: close,
        close,
        suspended,
        ..Bar::placeholder(symbol, day(i))
    }
}

/// A series whose `i`-th bar closes at `closes[i]`.
pub fn series(symbol: &str, closes: &[Decimal]) -> BarSeries {
    BarSeries {
        symbol: symbol.to_string(),
        bars: closes
            .iter()
            .enumerate()
            .map(|(i, &close)| bar(symbol, i as u64, close, false))
            .collect(),
        warmup: Vec::new(),
    }
}

/// A replayer over a flat benchmark and the given instruments, already on its first tick.
pub fn replayer(instruments: Vec<BarSeries>) -> Replayer {
    let len = instruments.iter().map(BarSeries::len).max().unwrap_or(1);
    let benchmark = series("IDX", &vec![Decimal::ONE_THOUSAND; len]);
    let symbols = instruments.iter().map(|s| s.symbol.clone()).collect();
    let mut replayer = Replayer::new(Universe {
        benchmark,
        instruments,
        symbols,
        pruned: Vec::new(),
    });
    replayer.advance().unwrap().unwrap();
    replayer
}
