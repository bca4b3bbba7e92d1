use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use stockfolio::application::indicators::{CLOSE_COLUMN, IndicatorEngine, RSI_COLUMN};
use stockfolio::domain::errors::IndicatorError;
use stockfolio::domain::ports::IndicatorObserver;
use stockfolio::domain::price_table::PriceTable;
use stockfolio::infrastructure::csv_loader::{load_csv_data, save_csv_data};
use stockfolio::infrastructure::storage::{create_directories, load_json_as, save_json};

#[derive(Default)]
struct CountingObserver {
    indicators: AtomicUsize,
}

impl IndicatorObserver for CountingObserver {
    fn on_indicator(&self, _name: &str, _column: &str, _window: usize) {
        self.indicators.fetch_add(1, Ordering::SeqCst);
    }
}

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "stockfolio_it_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    create_directories(&[&dir], false).expect("Failed to create test dir");
    dir
}

fn trending_csv(rows: usize) -> String {
    let mut csv = String::from("Date,Open,Close\n");
    for i in 0..rows {
        let close = 100.0 + i as f64 * 0.5 + ((i % 7) as f64 - 3.0);
        csv.push_str(&format!("day-{:04},{},{}\n", i, close - 0.25, close));
    }
    csv
}

#[test]
fn test_csv_to_indicators_to_csv() {
    let dir = test_dir("csv_pipeline");
    let input = dir.join("prices.csv");
    let output = dir.join("indicators.csv");
    fs::write(&input, trending_csv(240)).unwrap();

    let mut table = load_csv_data(&input).unwrap();
    let observer = Arc::new(CountingObserver::default());
    IndicatorEngine::new(observer.clone())
        .create_technical_indicators(&mut table)
        .unwrap();
    save_csv_data(&table, &output).unwrap();

    assert_eq!(observer.indicators.load(Ordering::SeqCst), 3);

    let reloaded = load_csv_data(&output).unwrap();
    assert_eq!(reloaded.len(), 240);
    assert_eq!(
        reloaded.column_names(),
        vec!["Open", CLOSE_COLUMN, "MA_50", "MA_200", RSI_COLUMN]
    );
    assert_eq!(reloaded.index()[239], "day-0239");

    let ma_200 = reloaded.column("MA_200").unwrap();
    assert!(ma_200[198].is_none());
    assert!(ma_200[199].is_some());

    for rsi in reloaded.column(RSI_COLUMN).unwrap().iter().flatten() {
        assert!((0.0..=100.0).contains(rsi));
    }

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_table_json_persistence() {
    let dir = test_dir("json_table");
    let path = dir.join("table.json");
    let mut table = PriceTable::from_columns([(CLOSE_COLUMN, vec![1.0, 2.0, 3.0, 4.0])]).unwrap();
    IndicatorEngine::default()
        .compute_moving_average(&mut table, CLOSE_COLUMN, 2)
        .unwrap();

    save_json(&path, &table).unwrap();
    let loaded: PriceTable = load_json_as(&path).unwrap();

    assert_eq!(loaded, table);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_table_json_persistence_keeps_nan_rsi() {
    let dir = test_dir("json_nan");
    let path = dir.join("table.json");
    let mut table = PriceTable::from_columns([(CLOSE_COLUMN, vec![5.0; 6])]).unwrap();
    IndicatorEngine::default()
        .compute_rsi(&mut table, CLOSE_COLUMN, 3)
        .unwrap();

    save_json(&path, &table).unwrap();
    let loaded: PriceTable = load_json_as(&path).unwrap();

    let rsi = loaded.column(RSI_COLUMN).unwrap();
    assert_eq!(&rsi[..2], &[None, None]);
    assert!(rsi[2..].iter().all(|v| v.is_some_and(f64::is_nan)));
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_failed_step_keeps_earlier_columns() {
    let mut table = PriceTable::from_columns([(CLOSE_COLUMN, vec![10.0; 30])]).unwrap();
    let engine = IndicatorEngine::default();

    engine
        .compute_moving_average(&mut table, CLOSE_COLUMN, 5)
        .unwrap();
    let err = engine
        .compute_rsi(&mut table, "Adj Close", 14)
        .unwrap_err();

    assert!(matches!(err, IndicatorError::MissingColumn { .. }));
    assert!(table.has_column("MA_5"));
    assert!(!table.has_column(RSI_COLUMN));
}

#[test]
fn test_missing_close_in_csv_fails_pipeline() {
    let dir = test_dir("no_close");
    let input = dir.join("prices.csv");
    fs::write(&input, "Date,Open\n2024-01-02,1.0\n").unwrap();

    let mut table = load_csv_data(&input).unwrap();
    let err = IndicatorEngine::default()
        .create_technical_indicators(&mut table)
        .unwrap_err();

    assert!(matches!(err, IndicatorError::MissingColumn { column } if column == CLOSE_COLUMN));
    fs::remove_dir_all(dir).ok();
}
