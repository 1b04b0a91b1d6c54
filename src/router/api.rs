use crate::{error::InventoryError, state::AppState};
use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "inventoryImage";

/// Multipart field carrying the id of the item the image belongs to.
pub const ITEM_ID_FIELD: &str = "itemId";

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Added {
    pub message: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uploaded {
    pub message: &'static str,
    pub file_path: String,
}

pub async fn list(state: State<AppState>) -> Result<Json<Vec<Value>>, InventoryError> {
    let items = state.inventory.list().await?;
    debug!("Listing {} items", items.len());
    Ok(Json(items))
}

pub async fn replace_all(
    state: State<AppState>,
    body: Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<Json<Message>, InventoryError> {
    let Json(items) = body?;
    state.inventory.replace_all(items).await?;
    Ok(Json(Message {
        message: "Inventory updated successfully",
    }))
}

pub async fn delete_item(
    state: State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, InventoryError> {
    state.inventory.delete(&id).await?;
    Ok(Json(Message {
        message: "Item deleted successfully",
    }))
}

pub async fn add_item(
    state: State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Added>, InventoryError> {
    let Json(item) = body?;
    let id = state.inventory.add(item).await?;
    Ok(Json(Added {
        message: "New item added successfully",
        id,
    }))
}

pub async fn upload_image(
    state: State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>, InventoryError> {
    let mut image = None;
    let mut item_id = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked
                if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                    continue;
                }
                image = Some((file_name, bytes));
            }
            Some(ITEM_ID_FIELD) => item_id = field.text().await?,
            _ => debug!("Ignoring multipart field {name:?}"),
        }
    }

    let Some((file_name, bytes)) = image else {
        return Err(InventoryError::MissingUpload);
    };

    let stored = state
        .inventory
        .attach_image(
            &item_id,
            &state.uploads,
            IMAGE_FIELD,
            file_name.as_deref(),
            &bytes,
        )
        .await?;

    info!("Uploaded {} for {item_id}", stored.file_name);

    Ok(Json(Uploaded {
        message: "Image uploaded successfully",
        file_path: stored.public_path,
    }))
}
