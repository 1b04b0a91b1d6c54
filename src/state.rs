use std::sync::Arc;

use minijinja::Environment;

use crate::{config::Config, inventory::Inventory, upload::UploadDir};

pub const INDEX: &str = include_str!("../public/index.html");

/// Shared handler state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub inventory: Inventory,

    pub uploads: UploadDir,

    pub views: Arc<Environment<'static>>,

    pub title: Arc<str>,
}

impl AppState {
    pub fn new(inventory: Inventory, uploads: UploadDir, title: &str) -> Self {
        let mut views = Environment::new();

        views
            .add_template("index.html", INDEX)
            .expect("unable to load template");

        Self {
            inventory,
            uploads,
            views: Arc::new(views),
            title: Arc::from(title),
        }
    }

    pub fn from_config(inventory: Inventory, uploads: UploadDir, config: &Config) -> Self {
        Self::new(inventory, uploads, &config.title)
    }
}
