//! Recently analyzed symbols.
//!
//! A bounded, ordered, deduplicated list of instrument identifiers,
//! most-recently-used first, persisted as a small JSON file in the platform
//! data directory. Unreadable state loads as an empty list — history is a
//! convenience, never an error source.

use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of symbols kept.
pub const CAPACITY: usize = 5;

/// Fixed storage key: file name within the application data directory.
const STORAGE_FILE: &str = "recent_symbols.json";
const APP_DIR: &str = "chartmind";

#[derive(Debug)]
pub struct RecentSymbols {
    path: PathBuf,
    symbols: Vec<String>,
}

impl RecentSymbols {
    /// Open the store at its default platform location.
    pub fn open_default() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self::open(dir.join(STORAGE_FILE))
    }

    /// Open a store backed by the given file, loading whatever is readable.
    pub fn open(path: PathBuf) -> Self {
        let symbols = load(&path);
        Self { path, symbols }
    }

    /// Record a symbol as most recently used.
    ///
    /// Empty input is ignored. An existing occurrence moves to the front
    /// rather than duplicating, and the list is truncated to [`CAPACITY`].
    pub fn record(&mut self, symbol: &str) {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return;
        }

        self.symbols.retain(|s| s != symbol);
        self.symbols.insert(0, symbol.to_string());
        self.symbols.truncate(CAPACITY);
        self.persist();
    }

    /// Ordered snapshot, most recent first.
    pub fn list(&self) -> &[String] {
        &self.symbols
    }

    fn persist(&self) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string(&self.symbols)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            fs::write(&self.path, json)
        };
        if let Err(e) = write() {
            // In-memory state stays authoritative for this process.
            tracing::warn!("failed to persist recent symbols to {:?}: {}", self.path, e);
        }
    }
}

fn load(path: &Path) -> Vec<String> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(mut symbols) => {
            symbols.truncate(CAPACITY);
            symbols
        }
        Err(e) => {
            tracing::warn!("ignoring corrupt recent-symbol store {:?}: {}", path, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, RecentSymbols) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecentSymbols::open(dir.path().join(STORAGE_FILE));
        (dir, store)
    }

    #[test]
    fn test_record_orders_most_recent_first() {
        let (_dir, mut store) = temp_store();
        store.record("NVDA");
        store.record("AAPL");

        assert_eq!(store.list(), ["AAPL", "NVDA"]);
    }

    #[test]
    fn test_record_is_idempotent_under_repetition() {
        let (_dir, mut store) = temp_store();
        store.record("NVDA");
        store.record("NVDA");

        assert_eq!(store.list(), ["NVDA"]);
    }

    #[test]
    fn test_re_record_moves_to_front_without_duplicate() {
        let (_dir, mut store) = temp_store();
        store.record("NVDA");
        store.record("AAPL");
        store.record("NVDA");

        assert_eq!(store.list(), ["NVDA", "AAPL"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (_dir, mut store) = temp_store();
        for symbol in ["A", "B", "C", "D", "E", "F"] {
            store.record(symbol);
        }

        assert_eq!(store.list(), ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn test_empty_symbol_is_ignored() {
        let (_dir, mut store) = temp_store();
        store.record("");
        store.record("   ");

        assert!(store.list().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);

        let mut store = RecentSymbols::open(path.clone());
        store.record("NVDA");
        store.record("TSLA");
        drop(store);

        let reopened = RecentSymbols::open(path);
        assert_eq!(reopened.list(), ["TSLA", "NVDA"]);
    }

    #[test]
    fn test_corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);
        fs::write(&path, "{not json").unwrap();

        let store = RecentSymbols::open(path);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_missing_file_loads_as_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().is_empty());
    }
}
