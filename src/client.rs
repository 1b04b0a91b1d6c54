use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    item::Item,
    router::api::{IMAGE_FIELD, ITEM_ID_FIELD},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_path: String,
}

/// Client for the inventory API.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl InventoryClient {
    /// Creates a client for the service at `base_url`, e.g. `http://10.0.0.4:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Item>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/inventory", self.base_url))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn replace_all(&self, items: &[Item]) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/api/updateInventory", self.base_url))
            .json(items)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        // Ids are free text, so the segment needs encoding
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "deleteItem", id]);

        let response = self.http.delete(url).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Adds an item and returns the id the server stored it under.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn add(&self, item: &Item) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/addNewItem", self.base_url))
            .json(item)
            .send()
            .await?;
        let added: AddResponse = check(response).await?.json().await?;
        Ok(added.id)
    }

    /// Uploads an image for an item and returns the server-relative path it
    /// was stored under.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn upload_image(
        &self,
        item_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let form = Form::new()
            .part(IMAGE_FIELD, Part::bytes(bytes).file_name(file_name.to_string()))
            .text(ITEM_ID_FIELD, item_id.to_string());

        let response = self
            .http
            .post(format!("{}/api/uploadImage", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = check(response).await?.json().await?;
        Ok(uploaded.file_path)
    }

    /// Absolute URL of a server-relative path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Request failed with {status}: {body}");

    Err(ClientError::Api {
        status: status.as_u16(),
        message: body,
    })
}
