use crate::error::BarStoreError;
use crate::record::BarRecord;
use chrono::NaiveDate;
use core_types::Bar;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One instrument's history, split at the start of the replay window.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub symbol: String,
    /// Bars inside `[start_date, end_date]`, date-ascending and never empty.
    pub bars: Vec<Bar>,
    /// Every bar strictly before `start_date`, used to seed lookback windows.
    pub warmup: Vec<Bar>,
}

impl BarSeries {
    /// Date of the first in-window bar.
    pub fn first_date(&self) -> NaiveDate {
        // `bars` is non-empty by construction in `BarRepository::load`.
        self.bars[0].date
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Reads per-instrument CSV files from a data directory and splits them around
/// the configured replay window.
#[derive(Debug, Clone)]
pub struct BarRepository {
    data_dir: PathBuf,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl BarRepository {
    pub fn new(data_dir: impl Into<PathBuf>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            data_dir: data_dir.into(),
            start_date,
            end_date,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.csv"))
    }

    /// Loads one instrument and splits it into window bars and warm-up history.
    ///
    /// Fails with `DataUnavailable` when the file is missing, its rows are not
    /// strictly date-ascending, or no bar falls inside the window.
    pub fn load(&self, symbol: &str) -> Result<BarSeries, BarStoreError> {
        let all = self.read_all(symbol)?;

        let (warmup, rest): (Vec<Bar>, Vec<Bar>) =
            all.into_iter().partition(|bar| bar.date < self.start_date);
        let bars: Vec<Bar> = rest
            .into_iter()
            .filter(|bar| bar.date <= self.end_date)
            .collect();

        if bars.is_empty() {
            return Err(BarStoreError::unavailable(
                symbol,
                format!(
                    "no bars between {} and {}",
                    self.start_date, self.end_date
                ),
            ));
        }

        tracing::debug!(
            symbol,
            bars = bars.len(),
            warmup = warmup.len(),
            "Loaded bar series"
        );

        Ok(BarSeries {
            symbol: symbol.to_string(),
            bars,
            warmup,
        })
    }

    /// Reads every row of an instrument's file without any date filtering.
    pub fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, BarStoreError> {
        let path = self.path_for(symbol);
        let mut reader = match csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(&path) {
            Ok(reader) => reader,
            Err(e) => return Err(open_error(symbol, path, e)),
        };

        let mut bars: Vec<Bar> = Vec::new();
        for row in reader.deserialize::<BarRecord>() {
            let bar: Bar = row
                .map_err(|source| BarStoreError::Csv {
                    path: path.clone(),
                    source,
                })?
                .into();

            if let Some(prev) = bars.last() {
                if bar.date <= prev.date {
                    return Err(BarStoreError::unavailable(
                        symbol,
                        format!("rows are not date-ascending at {}", bar.date),
                    ));
                }
            }
            bars.push(bar);
        }

        Ok(bars)
    }
}

fn open_error(symbol: &str, path: PathBuf, error: csv::Error) -> BarStoreError {
    if let csv::ErrorKind::Io(io) = error.kind() {
        if io.kind() == ErrorKind::NotFound {
            return BarStoreError::unavailable(symbol, format!("{} does not exist", path.display()));
        }
    }
    BarStoreError::Csv {
        path,
        source: error,
    }
}
