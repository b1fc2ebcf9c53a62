//! Durable storage for the set of watched coin ids
//!
//! The watchlist lives in a pretty-printed JSON array of id strings under the
//! platform data directory. Saves are serialized through an internal mutex so
//! two concurrent toggles can never interleave partial writes to the file.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{constants::WATCHLIST_FILE_NAME, error::WatchlistError};

/// Load/save interface for the persisted watchlist
pub struct WatchlistStore {
    path: PathBuf,
    /// Single-writer ordering for the file
    write_lock: Mutex<()>,
}

impl WatchlistStore {
    /// Creates a store targeting the conventional platform data directory
    ///
    /// # Errors
    /// Returns `WatchlistError::NoDataDir` if no data directory can be
    /// determined for the current platform.
    pub fn new() -> Result<Self, WatchlistError> {
        let proj_dirs =
            ProjectDirs::from("dev", "coin-tracker", "coin-tracker").ok_or(WatchlistError::NoDataDir)?;
        Ok(Self::with_path(
            proj_dirs.data_dir().join(WATCHLIST_FILE_NAME),
        ))
    }

    /// Creates a store targeting an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the watchlist file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Writes the given ids to the watchlist file, replacing prior content
    ///
    /// Creates the parent directory on first use.
    ///
    /// # Errors
    /// Returns `WatchlistError::Io` if the directory or file cannot be
    /// written.
    pub async fn save(&self, ids: &[String]) -> Result<(), WatchlistError> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(ids)?;
        fs::write(&self.path, json)?;
        debug!(count = ids.len(), path = %self.path.display(), "Saved watchlist");
        Ok(())
    }

    /// Reads the persisted set of watched ids
    ///
    /// A missing file is not an error - it simply means nothing was ever
    /// saved, and the empty set is returned.
    ///
    /// # Errors
    /// Returns `WatchlistError::Io` on read failure other than absence, or
    /// `WatchlistError::Malformed` if the file is not a JSON string array.
    pub async fn load(&self) -> Result<HashSet<String>, WatchlistError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No watchlist file, starting fresh");
                return Ok(HashSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let ids: Vec<String> = serde_json::from_str(&contents)?;
        debug!(count = ids.len(), "Loaded watchlist");
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> WatchlistStore {
        WatchlistStore::with_path(dir.path().join("nested").join(WATCHLIST_FILE_NAME))
    }

    #[tokio::test]
    async fn load_without_prior_save_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let ids = vec!["bitcoin".to_string(), "ethereum".to_string()];
        store.save(&ids).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, ids.into_iter().collect());
    }

    #[tokio::test]
    async fn save_empty_set_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&["solana".to_string()]).await.unwrap();
        store.save(&[]).await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_is_a_pretty_printed_json_array() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&["bitcoin".to_string()]).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains('\n'));
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["bitcoin".to_string()]);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.load().await,
            Err(WatchlistError::Malformed(_))
        ));
    }
}
