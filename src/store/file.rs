use super::StateStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One `<key>.json` file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Storage(format!("invalid store key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write to temp file first, then rename
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FavoriteSet;
    use crate::store::{load_or_default, save_json, FAVORITES_KEY};

    #[tokio::test]
    async fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        assert_eq!(store.get("listiq-favorites").await.unwrap(), None);

        store.set("listiq-favorites", r#"["a"]"#).await.unwrap();
        assert_eq!(
            store.get("listiq-favorites").await.unwrap().as_deref(),
            Some(r#"["a"]"#)
        );
        assert!(dir.path().join("state/listiq-favorites.json").exists());

        store.remove("listiq-favorites").await.unwrap();
        store.remove("listiq-favorites").await.unwrap();
        assert_eq!(store.get("listiq-favorites").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.set("../escape", "{}").await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn malformed_values_fall_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set(FAVORITES_KEY, "{not json").await.unwrap();
        let favorites: FavoriteSet = load_or_default(&store, FAVORITES_KEY).await;
        assert!(favorites.is_empty());
        assert_eq!(store.get(FAVORITES_KEY).await.unwrap(), None);
        assert!(!store.dir().join(format!("{FAVORITES_KEY}.json")).exists());

        let mut fresh = FavoriteSet::default();
        fresh.insert("p1");
        save_json(&store, FAVORITES_KEY, &fresh).await.unwrap();
        let loaded: FavoriteSet = load_or_default(&store, FAVORITES_KEY).await;
        assert_eq!(loaded, fresh);
    }
}
