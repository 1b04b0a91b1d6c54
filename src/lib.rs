use tracing::info;

use crate::{
    config::Config, error::InventoryError, inventory::Inventory, state::AppState,
    store::JsonFileStore, upload::UploadDir,
};

pub mod client;
pub mod config;
pub mod error;
pub mod inventory;
pub mod item;
pub mod router;
pub mod session;
pub mod state;
pub mod store;
pub mod upload;
pub mod view;

/// Opens the store file and upload directory named in the config and builds
/// the application router on top of them.
pub async fn app(config: &Config) -> Result<axum::Router, InventoryError> {
    let store = JsonFileStore::init(&config.store_path).await?;
    let uploads = UploadDir::init(&config.upload_dir).await?;

    info!(
        "Serving {} with uploads in {}",
        store.path().display(),
        uploads.root().display()
    );

    let state = AppState::from_config(Inventory::new(store), uploads, config);

    Ok(router::router(state, config))
}
