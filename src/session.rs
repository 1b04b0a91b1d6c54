//! The client side of the list view.
//!
//! A [Session] owns the working copy of the inventory for as long as the view
//! is open. Edits are applied locally first and pushed to the service as whole
//! collections, the same way the browser page does it.

use tracing::{error, info};

use crate::{
    client::{ClientError, InventoryClient},
    item::{random_id, Field, Item},
};

/// Which row, if any, is in inline-edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowMode {
    #[default]
    Viewing,
    Editing(String),
}

impl RowMode {
    pub fn is_editing(&self, id: &str) -> bool {
        matches!(self, RowMode::Editing(editing) if editing == id)
    }
}

/// Items whose name contains `query`, ignoring case.
pub fn filter_by_name<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .collect()
}

#[derive(Debug)]
pub struct Session {
    client: InventoryClient,
    items: Vec<Item>,
    mode: RowMode,
    query: String,
    draft: Option<Item>,
}

impl Session {
    /// Opens the view with the current collection.
    pub async fn open(client: InventoryClient) -> Result<Self, ClientError> {
        let items = client.list().await?;
        info!("Loaded {} items", items.len());
        Ok(Self::with_items(client, items))
    }

    pub fn with_items(client: InventoryClient, items: Vec<Item>) -> Self {
        Self {
            client,
            items,
            mode: RowMode::Viewing,
            query: String::new(),
            draft: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn mode(&self) -> &RowMode {
        &self.mode
    }

    pub fn draft(&self) -> Option<&Item> {
        self.draft.as_ref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The rows currently shown.
    pub fn visible(&self) -> Vec<&Item> {
        filter_by_name(&self.items, &self.query)
    }

    /// Puts a row into edit mode. Any other row leaves edit mode without
    /// saving. The local copy is not refreshed.
    pub fn begin_edit(&mut self, id: &str) {
        self.mode = RowMode::Editing(id.to_string());
    }

    pub fn edit_field(&mut self, id: &str, field: Field, value: impl Into<String>) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.set_field(field, value);
        }
    }

    /// Leaves edit mode and pushes the whole local list.
    ///
    /// Edit mode is left even if the save fails; the local copy is kept as is.
    pub async fn save(&mut self, id: &str) -> Result<(), ClientError> {
        if !self.mode.is_editing(id) {
            return Ok(());
        }
        self.mode = RowMode::Viewing;

        self.client
            .replace_all(&self.items)
            .await
            .inspect_err(|e| error!("Error saving inventory: {e}"))
    }

    /// Deletes on the service, then locally. A failed call leaves the item in place.
    pub async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        if let Err(e) = self.client.delete(id).await {
            error!("Failed to delete item {id}: {e}");
            return Err(e);
        }

        if let Some(position) = self.items.iter().position(|item| item.id == id) {
            self.items.remove(position);
        }
        if self.mode.is_editing(id) {
            self.mode = RowMode::Viewing;
        }

        info!("Item deleted successfully");
        Ok(())
    }

    /// Opens a blank row for a new item and returns its provisional id.
    pub fn begin_add(&mut self) -> String {
        let id = random_id();
        self.draft = Some(Item::with_id(id.clone()));
        id
    }

    pub fn edit_draft(&mut self, field: Field, value: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.set_field(field, value);
        }
    }

    /// Sends the draft to the service and appends it locally under the id the
    /// service assigned. On failure the draft stays open.
    pub async fn finish_add(&mut self) -> Result<Option<String>, ClientError> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(None);
        };

        let id = match self.client.add(draft).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to add new item: {e}");
                return Err(e);
            }
        };

        if let Some(mut item) = self.draft.take() {
            item.id = id.clone();
            self.items.push(item);
        }

        Ok(Some(id))
    }

    /// Uploads an image and points the item at its absolute URL.
    pub async fn upload_image(
        &mut self,
        id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ClientError> {
        let path = self
            .client
            .upload_image(id, file_name, bytes)
            .await
            .inspect_err(|e| error!("Error uploading image: {e}"))?;

        let url = self.client.url_for(&path);
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.image_path = url;
        }

        Ok(())
    }
}
