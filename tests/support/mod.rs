#![allow(dead_code)]

use std::path::PathBuf;

use gearledger::{config::Config, item::Item};
use serde_json::Value;
use tempfile::TempDir;

pub struct TestServer {
    pub base: String,
    pub dir: TempDir,
}

impl TestServer {
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("inventoryList.json")
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn stored(&self) -> Vec<Item> {
        let content = std::fs::read_to_string(self.store_path()).expect("read store");
        serde_json::from_str(&content).expect("parse store")
    }

    /// The store file exactly as the server wrote it.
    pub fn stored_raw(&self) -> Vec<Value> {
        let content = std::fs::read_to_string(self.store_path()).expect("read store");
        serde_json::from_str(&content).expect("parse store")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

pub async fn start(items: &[Item]) -> TestServer {
    start_with_store(&serde_json::to_string_pretty(items).expect("serialize items")).await
}

/// Starts a server over a store file holding `content` verbatim.
pub async fn start_with_store(content: &str) -> TestServer {
    let dir = TempDir::new().expect("tempdir");
    let config = Config {
        store_path: dir.path().join("inventoryList.json").display().to_string(),
        upload_dir: dir.path().join("uploads").display().to_string(),
        public_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
        ..Default::default()
    };

    std::fs::write(&config.store_path, content).expect("seed store");

    let app = gearledger::app(&config).await.expect("app");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });

    TestServer {
        base: format!("http://{addr}"),
        dir,
    }
}

pub fn item(id: &str, name: &str, owner: &str) -> Item {
    let mut item = Item::with_id(id);
    item.name = name.to_string();
    item.current_owner = owner.to_string();
    item
}

pub fn fleet() -> Vec<Item> {
    vec![
        item("a1", "Drill", ""),
        item("b2", "Saw", "Team Rover"),
        item("c3", "drill bit", ""),
    ]
}
