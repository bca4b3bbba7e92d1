//! JSON / binary persistence and filesystem helpers.

use crate::domain::errors::StorageError;
use crate::infrastructure::storage::config_box::ConfigBox;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;
use tracing::info;

/// Creates each directory (and its parents). Existing directories are fine.
pub fn create_directories<P: AsRef<Path>>(paths: &[P], verbose: bool) -> Result<(), StorageError> {
    for path in paths {
        let path = path.as_ref();
        fs::create_dir_all(path).map_err(|e| StorageError::io(path, e))?;
        if verbose {
            info!("Created directory at: {:?}", path);
        }
    }
    Ok(())
}

/// Writes `data` as JSON indented by four spaces.
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<(), StorageError> {
    let path = path.as_ref();

    let mut content = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut content, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut serializer)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    // Atomic write: write to temp file then rename
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| StorageError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| StorageError::io(path, e))?;

    info!("JSON file saved at: {:?}", path);
    Ok(())
}

pub fn load_json(path: impl AsRef<Path>) -> Result<ConfigBox, StorageError> {
    let config = load_json_as(path.as_ref())?;
    info!("JSON file loaded successfully from: {:?}", path.as_ref());
    Ok(ConfigBox::new(config))
}

pub fn load_json_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, StorageError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_bin(data: &[u8], path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    fs::write(path, data).map_err(|e| StorageError::io(path, e))?;
    info!("Binary file saved at: {:?}", path);
    Ok(())
}

pub fn load_bin(path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| StorageError::io(path, e))?;
    info!("Binary file loaded from: {:?}", path);
    Ok(data)
}

/// Size of the file in kilobytes, formatted as `~ N KB`.
pub fn get_size(path: impl AsRef<Path>) -> Result<String, StorageError> {
    let path = path.as_ref();
    let bytes = fs::metadata(path)
        .map_err(|e| StorageError::io(path, e))?
        .len();
    Ok(format_size_kb(bytes))
}

fn format_size_kb(bytes: u64) -> String {
    let size_in_kb = (bytes as f64 / 1024.0).round_ties_even() as u64;
    format!("~ {} KB", size_in_kb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_test_dir() -> PathBuf {
        let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "stockfolio_files_test_{}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            unique_id
        ));
        fs::create_dir_all(&temp_dir).expect("Failed to create test temp dir");
        temp_dir
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Scores {
        sharpe: f64,
        tickers: Vec<String>,
    }

    #[test]
    fn test_create_directories_is_idempotent() {
        let temp_dir = create_test_dir();
        let nested = temp_dir.join("a/b/c");
        let other = temp_dir.join("d");

        create_directories(&[&nested, &other], true).unwrap();
        create_directories(&[&nested], false).unwrap();

        assert!(nested.is_dir());
        assert!(other.is_dir());
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_json_save_and_load() {
        let temp_dir = create_test_dir();
        let path = temp_dir.join("scores.json");
        let scores = Scores {
            sharpe: 1.25,
            tickers: vec!["AAPL".to_string(), "MSFT".to_string()],
        };

        save_json(&path, &scores).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"sharpe\": 1.25"));
        assert!(!temp_dir.join("scores.tmp").exists());

        let loaded = load_json(&path).unwrap();
        assert_eq!(loaded.get_as::<f64>("sharpe").unwrap(), 1.25);
        assert_eq!(load_json_as::<Scores>(&path).unwrap(), scores);
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = create_test_dir();
        let path = temp_dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_json(&path), Err(StorageError::Json { .. })));
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_binary_blob_roundtrip() {
        let temp_dir = create_test_dir();
        let path = temp_dir.join("model.bin");
        let blob: Vec<u8> = (0..=255).collect();

        save_bin(&blob, &path).unwrap();
        assert_eq!(load_bin(&path).unwrap(), blob);
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_get_size() {
        let temp_dir = create_test_dir();
        let path = temp_dir.join("payload.bin");
        fs::write(&path, vec![0u8; 3 * 1024 + 100]).unwrap();

        assert_eq!(get_size(&path).unwrap(), "~ 3 KB");
        fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_size_rounding() {
        assert_eq!(format_size_kb(0), "~ 0 KB");
        assert_eq!(format_size_kb(512), "~ 0 KB");
        assert_eq!(format_size_kb(1536), "~ 2 KB");
        assert_eq!(format_size_kb(1700), "~ 2 KB");
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(matches!(
            load_bin("/nonexistent/stockfolio.bin"),
            Err(StorageError::Io { .. })
        ));
        assert!(get_size("/nonexistent/stockfolio.bin").is_err());
    }
}
