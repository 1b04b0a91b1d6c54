use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    error::InventoryError,
    store::InventoryStore,
    upload::{StoredUpload, UploadDir},
};

/// The inventory collection behind a single writer lock.
///
/// Records are handled as raw JSON objects; only `id` and `imagePath` are ever
/// looked at. Every operation holds the lock for its whole read-modify-write
/// cycle, so two concurrent writers never interleave and no update is lost.
#[derive(Debug, Clone)]
pub struct Inventory {
    store: Arc<dyn InventoryStore>,
    lock: Arc<Mutex<()>>,
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

impl Inventory {
    pub fn new(store: impl InventoryStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<Value>, InventoryError> {
        let _guard = self.lock.lock().await;
        self.store.read_all().await
    }

    /// Overwrites the whole collection with exactly the given records.
    pub async fn replace_all(&self, items: Vec<Value>) -> Result<(), InventoryError> {
        let _guard = self.lock.lock().await;
        self.store.write_all(&items).await?;
        info!("Inventory replaced with {} items", items.len());
        Ok(())
    }

    /// Removes the first record with the given id. Returns whether anything was
    /// removed, an absent id is not an error.
    pub async fn delete(&self, id: &str) -> Result<bool, InventoryError> {
        let _guard = self.lock.lock().await;

        let mut items = self.store.read_all().await?;
        let position = items.iter().position(|item| record_id(item) == Some(id));

        if let Some(position) = position {
            items.remove(position);
        }

        self.store.write_all(&items).await?;

        if position.is_some() {
            info!("Deleted item {id}");
        } else {
            debug!("Delete of unknown item {id}");
        }

        Ok(position.is_some())
    }

    /// Appends a record and returns the id it was stored under.
    ///
    /// The incoming id is kept when it is a non-empty string that is not taken,
    /// otherwise a fresh one is issued.
    pub async fn add(&self, mut item: Map<String, Value>) -> Result<String, InventoryError> {
        let _guard = self.lock.lock().await;

        let mut items = self.store.read_all().await?;

        let requested = item
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .filter(|id| !items.iter().any(|existing| record_id(existing) == Some(id)))
            .map(str::to_owned);

        let id = match requested {
            Some(id) => id,
            None => {
                let issued = uuid::Uuid::new_v4().to_string();
                debug!("Issuing id {issued} in place of {:?}", item.get("id"));
                item.insert("id".to_string(), Value::String(issued.clone()));
                issued
            }
        };

        items.push(Value::Object(item));
        self.store.write_all(&items).await?;

        info!("Added item {id}");
        Ok(id)
    }

    /// Stores an image and links it to the record with the given id.
    ///
    /// Nothing is written, neither the image nor the store, if the record does
    /// not exist.
    pub async fn attach_image(
        &self,
        id: &str,
        uploads: &UploadDir,
        field: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredUpload, InventoryError> {
        let _guard = self.lock.lock().await;

        let mut items = self.store.read_all().await?;
        let Some(item) = items
            .iter_mut()
            .filter(|item| record_id(item) == Some(id))
            .find_map(Value::as_object_mut)
        else {
            return Err(InventoryError::ItemNotFound(id.to_string()));
        };

        let stored = uploads.save(field, original_name, bytes).await?;
        item.insert(
            "imagePath".to_string(),
            Value::String(stored.public_path.clone()),
        );

        self.store.write_all(&items).await?;

        info!("Linked {} to item {id}", stored.public_path);
        Ok(stored)
    }
}
