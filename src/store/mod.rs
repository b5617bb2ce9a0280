//! Key/value persistence for the comparison state.
//!
//! Values are JSON documents under fixed keys. There is no schema version:
//! a value that no longer decodes is logged, removed and replaced by its
//! default.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub const PROPERTIES_KEY: &str = "listiq-properties";
pub const FAVORITES_KEY: &str = "listiq-favorites";
pub const SAVED_SEARCHES_KEY: &str = "listiq-saved-searches";
pub const SORT_PREFERENCE_KEY: &str = "listiq-sort-preference";
pub const MORTGAGE_SETTINGS_KEY: &str = "listiq-mortgage-settings";

/// Storage backend injected into the comparison controller
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Raw value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Decode the JSON stored under `key`, falling back to the default when the
/// key is missing, unreadable or malformed. Malformed values are removed.
pub async fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: StateStore + ?Sized,
{
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Removing malformed stored value");
            if let Err(e) = store.remove(key).await {
                warn!(key, error = %e, "Failed to remove malformed value");
            }
            T::default()
        }
    }
}

/// Encode `value` as JSON under `key`
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: StateStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json).await
}
