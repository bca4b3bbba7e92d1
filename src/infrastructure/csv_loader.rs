//! Delimited-text import / export of `PriceTable`s.
//!
//! The first column named `Date`, `Datetime` or `Timestamp` (any case) becomes
//! the row index; every other column must be numeric. Empty cells and the
//! markers `NA`, `null` and `None` load as missing values, while `NaN` loads as
//! a not-a-number value so a saved table reads back unchanged.

use crate::domain::errors::StorageError;
use crate::domain::price_table::PriceTable;
use std::path::Path;
use tracing::{debug, info};

const INDEX_HEADERS: [&str; 3] = ["date", "datetime", "timestamp"];
const MISSING_MARKERS: [&str; 4] = ["", "na", "null", "none"];

fn is_index_header(header: &str) -> bool {
    INDEX_HEADERS.contains(&header.to_lowercase().as_str())
}

fn parse_cell(field: &str) -> Option<Result<f64, std::num::ParseFloatError>> {
    if MISSING_MARKERS.contains(&field.to_lowercase().as_str()) {
        return None;
    }
    Some(field.parse::<f64>())
}

pub fn load_csv_data(file_path: impl AsRef<Path>) -> Result<PriceTable, StorageError> {
    let path = file_path.as_ref();
    let csv_error = |source: csv::Error| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let index_pos = headers.iter().position(is_index_header);

    let mut index = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        for (col, field) in record.iter().enumerate() {
            if Some(col) == index_pos {
                index.push(field.to_string());
                continue;
            }
            let cell = parse_cell(field)
                .transpose()
                .map_err(|_| StorageError::Parse {
                    column: headers[col].to_string(),
                    row,
                    value: field.to_string(),
                })?;
            columns[col].push(cell);
        }
        if index_pos.is_none() {
            index.push(row.to_string());
        }
    }

    let mut table = PriceTable::with_index(index);
    for (col, (name, values)) in headers.iter().zip(columns).enumerate() {
        if Some(col) != index_pos {
            table.insert_column(name, values)?;
        }
    }

    debug!("CSV columns: {:?}", table.column_names());
    info!("CSV data loaded from: {:?} ({} rows)", path, table.len());
    Ok(table)
}

/// Writes `table` with its index as a leading `Date` column.
pub fn save_csv_data(table: &PriceTable, file_path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = file_path.as_ref();
    let csv_error = |source: csv::Error| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;

    let mut header = vec!["Date"];
    header.extend(table.column_names());
    writer.write_record(&header).map_err(csv_error)?;

    for (row, label) in table.index().iter().enumerate() {
        let mut record = Vec::with_capacity(table.columns().len() + 1);
        record.push(label.clone());
        for column in table.columns() {
            record.push(column.values[row].map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer
        .flush()
        .map_err(|e| StorageError::io(path, e))?;
    info!("CSV data saved at: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_csv(content: &str) -> (PathBuf, PathBuf) {
        let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "stockfolio_csv_test_{}_{}",
            std::process::id(),
            unique_id
        ));
        fs::create_dir_all(&temp_dir).expect("Failed to create test temp dir");
        let path = temp_dir.join("prices.csv");
        fs::write(&path, content).expect("Failed to write test csv");
        (path, temp_dir)
    }

    #[test]
    fn test_load_with_date_index() {
        let (path, temp_dir) = temp_csv(
            "Date,Open,Close,Volume\n\
             2024-01-02,10.0,10.5,1000\n\
             2024-01-03,10.5,,1200\n\
             2024-01-04,10.4,10.9,NaN\n",
        );

        let table = load_csv_data(&path).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.index()[0], "2024-01-02");
        assert_eq!(table.column_names(), vec!["Open", "Close", "Volume"]);
        assert_eq!(table.column("Close").unwrap(), &[Some(10.5), None, Some(10.9)]);
        assert!(table.column("Volume").unwrap()[2].unwrap().is_nan());
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_load_without_index_column() {
        let (path, temp_dir) = temp_csv("Close\n1\n2\n3\n");

        let table = load_csv_data(&path).unwrap();

        assert_eq!(table.index(), &["0", "1", "2"]);
        assert_eq!(table.column("Close").unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let (path, temp_dir) = temp_csv("Date,Close\n2024-01-02,abc\n");

        let err = load_csv_data(&path).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Parse { ref column, row: 0, .. } if column == "Close"
        ));
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let (path, temp_dir) = temp_csv("Date,Close\n2024-01-02,1.0,9\n");

        assert!(matches!(load_csv_data(&path), Err(StorageError::Csv { .. })));
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_save_then_load() {
        let (path, temp_dir) = temp_csv("");
        let mut table = PriceTable::with_index(vec!["d1".into(), "d2".into()]);
        table.insert_column("Close", vec![Some(1.5), None]).unwrap();
        table
            .insert_column("RSI", vec![None, Some(f64::NAN)])
            .unwrap();

        save_csv_data(&table, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Date,Close,RSI\nd1,1.5,\nd2,,NaN\n");

        let loaded = load_csv_data(&path).unwrap();
        assert_eq!(loaded.index(), &["d1", "d2"]);
        assert_eq!(loaded.column("Close").unwrap(), &[Some(1.5), None]);
        let rsi = loaded.column("RSI").unwrap();
        assert_eq!(rsi[0], None);
        assert!(rsi[1].unwrap().is_nan());
        fs::remove_dir_all(temp_dir).ok();
    }
}
