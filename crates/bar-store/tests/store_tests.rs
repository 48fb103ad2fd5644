use bar_store::{BarRepository, BarStoreError};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;

const HEADER: &str = "date_time,symbol,name,open,low,high,close,chg,pct_chg,volume,turnover,suspend";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_file(dir: &Path, symbol: &str, rows: &[&str]) {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    fs::write(dir.join(format!("{symbol}.csv")), body).unwrap();
}

fn row(symbol: &str, day: &str, close: &str, suspend: &str) -> String {
    format!("{day},{symbol},Name,{close},{close},{close},{close},0,0,1000,10000,{suspend}")
}

#[test]
fn splits_window_and_warmup() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [
        row("A", "2020-01-02", "9.5", "False"),
        row("A", "2020-01-03", "9.8", "False"),
        row("A", "2020-01-06", "10.1", "False"),
        row("A", "2020-01-07", "10.4", "True"),
        row("A", "2020-01-08", "10.2", "False"),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_file(dir.path(), "A", &rows);

    let repo = BarRepository::new(dir.path(), date(2020, 1, 6), date(2020, 1, 7));
    let series = repo.load("A").unwrap();

    assert_eq!(series.warmup.len(), 2);
    assert!(series.warmup.iter().all(|b| b.date < date(2020, 1, 6)));
    assert_eq!(series.len(), 2);
    assert_eq!(series.first_date(), date(2020, 1, 6));
    assert_eq!(series.bars[0].close, dec!(10.1));
    assert!(series.bars[1].suspended);
    assert!(!series.bars[0].suspended);
}

#[test]
fn missing_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let repo = BarRepository::new(dir.path(), date(2020, 1, 1), date(2020, 12, 31));

    match repo.load("NOPE") {
        Err(BarStoreError::DataUnavailable { symbol, .. }) => assert_eq!(symbol, "NOPE"),
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn empty_window_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [row("A", "2019-06-03", "9.5", "False")];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_file(dir.path(), "A", &rows);

    let repo = BarRepository::new(dir.path(), date(2020, 1, 1), date(2020, 12, 31));
    assert!(matches!(
        repo.load("A"),
        Err(BarStoreError::DataUnavailable { .. })
    ));
}

#[test]
fn unordered_rows_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [
        row("A", "2020-01-03", "9.5", "False"),
        row("A", "2020-01-02", "9.6", "False"),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_file(dir.path(), "A", &rows);

    let repo = BarRepository::new(dir.path(), date(2020, 1, 1), date(2020, 12, 31));
    match repo.load("A") {
        Err(BarStoreError::DataUnavailable { reason, .. }) => {
            assert!(reason.contains("date-ascending"))
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn malformed_number_is_a_csv_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "A",
        &["2020-01-02,A,Name,abc,1,1,1,0,0,1000,10000,False"],
    );

    let repo = BarRepository::new(dir.path(), date(2020, 1, 1), date(2020, 12, 31));
    assert!(matches!(repo.load("A"), Err(BarStoreError::Csv { .. })));
}

#[test]
fn universe_prunes_unavailable_instruments() {
    let dir = tempfile::tempdir().unwrap();
    for symbol in ["IDX", "A"] {
        let rows = [
            row(symbol, "2020-01-02", "10", "False"),
            row(symbol, "2020-01-03", "11", "False"),
        ];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        write_file(dir.path(), symbol, &rows);
    }
    // Listed only before the window.
    let late = [row("OLD", "2019-01-02", "5", "False")];
    let late: Vec<&str> = late.iter().map(String::as_str).collect();
    write_file(dir.path(), "OLD", &late);

    let repo = BarRepository::new(dir.path(), date(2020, 1, 1), date(2020, 12, 31));
    let symbols: Vec<String> = ["A", "MISSING", "OLD", "A", "IDX"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let universe = repo.load_universe("IDX", &symbols).unwrap();

    assert_eq!(universe.benchmark_symbol(), "IDX");
    assert_eq!(universe.symbols, vec!["A", "IDX"]);
    assert_eq!(universe.pruned, vec!["MISSING", "OLD"]);
    assert_eq!(universe.instruments.len(), 1);
    assert_eq!(universe.instruments[0].symbol, "A");
}

#[test]
fn missing_benchmark_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [row("A", "2020-01-02", "10", "False")];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_file(dir.path(), "A", &rows);

    let repo = BarRepository::new(dir.path(), date(2020, 1, 1), date(2020, 12, 31));
    let result = repo.load_universe("IDX", &["A".to_string()]);
    assert!(matches!(
        result,
        Err(BarStoreError::DataUnavailable { ref symbol, .. }) if symbol == "IDX"
    ));
}
