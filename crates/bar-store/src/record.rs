use chrono::NaiveDate;
use core_types::Bar;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};
use std::str::FromStr;

/// One CSV row in the on-disk layout:
/// `date_time, symbol, name, open, low, high, close, chg, pct_chg, volume, turnover, suspend`.
#[derive(Debug, Deserialize)]
pub(crate) struct BarRecord {
    #[serde(deserialize_with = "de_date")]
    date_time: NaiveDate,
    symbol: String,
    #[serde(default)]
    name: String,
    #[serde(deserialize_with = "de_decimal")]
    open: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    low: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    high: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    close: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    chg: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pct_chg: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    volume: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    turnover: Decimal,
    #[serde(deserialize_with = "de_flag")]
    suspend: bool,
}

impl From<BarRecord> for Bar {
    fn from(r: BarRecord) -> Self {
        Bar {
            date: r.date_time,
            symbol: r.symbol,
            name: r.name,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            change: r.chg,
            pct_change: r.pct_chg,
            volume: r.volume,
            turnover: r.turnover,
            suspended: r.suspend,
        }
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y%m%d"];

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(raw, fmt).ok().or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|dt| dt.date())
        })
    })
}

/// Empty cells and `nan` (what dataframe exports write for a missing first-day change)
/// read as zero.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(true),
        "false" | "0" | "0.0" | "" => Some(false),
        _ => None,
    }
}

fn de_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised date '{raw}'")))
}

fn de_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_decimal(&raw).ok_or_else(|| de::Error::custom(format!("invalid number '{raw}'")))
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid suspend flag '{raw}'")))
}
