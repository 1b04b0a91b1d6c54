use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::error::InventoryError;

/// URL prefix under which the upload directory is served.
pub const UPLOADS_ROUTE: &str = "uploads";

/// Blob storage for item images.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

/// An image that has been written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub file_name: String,

    /// Server-relative path, as referenced from an item's `imagePath`.
    pub public_path: String,
}

impl UploadDir {
    pub async fn init(root: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(InventoryError::Write)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(
        &self,
        field: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredUpload, InventoryError> {
        let file_name = upload_file_name(field, Utc::now().timestamp_millis(), original_name);
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(InventoryError::Write)?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());

        Ok(StoredUpload {
            public_path: format!("{UPLOADS_ROUTE}/{file_name}"),
            file_name,
        })
    }
}

/// `<field>-<millis><.ext>`, keeping only the extension of the original name.
pub fn upload_file_name(field: &str, millis: i64, original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    format!("{field}-{millis}{ext}")
}
