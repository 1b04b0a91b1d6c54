use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::InventoryError;

/// Persistence for the whole inventory collection.
///
/// Records are kept as raw JSON so whatever a client stored is handed back
/// unchanged. Implementations only ever deal in the full collection; there are
/// no partial updates. Callers that need read-modify-write semantics go through
/// [crate::inventory::Inventory], which serializes access.
#[async_trait]
pub trait InventoryStore: Send + Sync + std::fmt::Debug {
    async fn read_all(&self) -> Result<Vec<Value>, InventoryError>;
    async fn write_all(&self, items: &[Value]) -> Result<(), InventoryError>;
}

/// The store file: a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates the store with an empty collection if the file does not exist yet.
    pub async fn init(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let store = Self::new(path);

        if tokio::fs::try_exists(&store.path)
            .await
            .map_err(InventoryError::Read)?
        {
            debug!("Using existing store {}", store.path.display());
            return Ok(store);
        }

        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(InventoryError::Write)?;
            }
        }

        store.write_all(&[]).await?;
        info!("Created empty store at {}", store.path.display());

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl InventoryStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<Value>, InventoryError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(InventoryError::Read)?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_all(&self, items: &[Value]) -> Result<(), InventoryError> {
        let content = serde_json::to_string_pretty(items)?;

        // Written next to the target so the rename stays on one filesystem
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, content)
            .await
            .map_err(InventoryError::Write)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(InventoryError::Write)?;

        debug!("Wrote {} items to {}", items.len(), self.path.display());
        Ok(())
    }
}

/// In-process store, used for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<Vec<Value>>,
}

impl MemoryStore {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<Value>, InventoryError> {
        Ok(self.items.read().await.clone())
    }

    async fn write_all(&self, items: &[Value]) -> Result<(), InventoryError> {
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn items() -> Vec<Value> {
        vec![
            json!({ "id": "a1", "name": "Drill" }),
            json!({ "id": "b2", "name": "Saw", "serial": 12345, "currentOwner": null }),
        ]
    }

    #[tokio::test]
    async fn init_creates_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("inventoryList.json");

        let store = JsonFileStore::init(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventoryList.json");
        std::fs::write(&path, r#"[{"id":"x","name":"Tripod"}]"#).unwrap();

        let store = JsonFileStore::init(&path).await.unwrap();
        let items = store.read_all().await.unwrap();

        assert_eq!(items, [json!({ "id": "x", "name": "Tripod" })]);
    }

    #[tokio::test]
    async fn write_then_read_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::init(dir.path().join("inventoryList.json"))
            .await
            .unwrap();

        store.write_all(&items()).await.unwrap();

        assert_eq!(store.read_all().await.unwrap(), items());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn writes_pretty_printed_json() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::init(dir.path().join("inventoryList.json"))
            .await
            .unwrap();

        store.write_all(&items()).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"id\": \"a1\""));
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventoryList.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).read_all().await.unwrap_err();
        assert!(matches!(err, InventoryError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = JsonFileStore::new(dir.path().join("nope.json"))
            .read_all()
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Read(_)));
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::default();
        store.write_all(&items()).await.unwrap();
        assert_eq!(store.read_all().await.unwrap(), items());
    }
}
