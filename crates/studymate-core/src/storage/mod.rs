//! Persistent key-value storage port and backends.
//!
//! Services read and write whole JSON-serialized lists through a small
//! string-keyed store. The port is injectable so tests run against
//! [`MemoryStore`] while the app runs against [`SqliteStore`].

mod config;
pub mod memory;
pub mod sqlite;

pub use config::{ApiConfig, Config, DEFAULT_API_BASE_URL};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StorageError;

/// Keys for the persisted JSON blobs.
///
/// These are the exact keys the mobile client uses, so a store migrated
/// from it keeps working unchanged.
pub mod keys {
    pub const SUBJECTS: &str = "@studymate_subjects";
    pub const SESSIONS: &str = "@studymate_sessions";
    pub const GOALS: &str = "@studymate_goals";
    pub const BACKEND_EVENTS: &str = "@studymate_backend_events";
    pub const LAST_SYNC: &str = "@studymate_last_sync";

    /// Every key the store may hold.
    pub const ALL: [&str; 5] = [SUBJECTS, SESSIONS, GOALS, BACKEND_EVENTS, LAST_SYNC];
}

/// Asynchronous string-keyed persistent store.
///
/// No transactionality: concurrent writers to the same key race and the
/// last write wins, acceptable for a single-user interactive client.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every listed key. Missing keys are ignored.
    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Remove every StudyMate key from the store.
pub async fn clear_all_data(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.multi_remove(&keys::ALL).await?;
    debug!("all local data cleared");
    Ok(())
}

/// Returns `~/.config/studymate[-dev]/` based on STUDYMATE_ENV.
///
/// Set STUDYMATE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYMATE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studymate-dev")
    } else {
        base_dir.join("studymate")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_all_data_removes_every_key() {
        let store = MemoryStore::new();
        for key in keys::ALL {
            store.set(key, "[]").await.unwrap();
        }
        store.set("unrelated", "kept").await.unwrap();

        clear_all_data(&store).await.unwrap();

        for key in keys::ALL {
            assert!(store.get(key).await.unwrap().is_none());
        }
        assert_eq!(store.get("unrelated").await.unwrap().as_deref(), Some("kept"));
    }
}
