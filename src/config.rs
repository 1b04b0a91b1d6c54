use crate::error::InventoryError;
use clap::Parser;
use serde::Deserialize;
use std::{fs, io::ErrorKind, path::Path};
use tracing::warn;

#[derive(Debug, Clone, Parser)]
pub struct StartArgs {
    #[arg(short, long, default_value = "config.json")]
    pub config_path: String,

    #[arg(short, long, default_value = "0.0.0.0")]
    pub address: String,

    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    #[arg(short, long, default_value = "INFO")]
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The page title for the front end
    pub title: String,

    /// Location of the store file
    pub store_path: String,

    /// Directory uploaded images are written to and served from
    pub upload_dir: String,

    /// Directory holding the page's script and stylesheet
    pub public_dir: String,

    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Equipment Inventory".to_string(),
            store_path: "inventoryList.json".to_string(),
            upload_dir: "uploads".to_string(),
            public_dir: "public".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let config = fs::read_to_string(path).map_err(InventoryError::Read)?;
        Ok(serde_json::from_str(&config)?)
    }

    /// Like [Config::read], but a missing file yields the defaults.
    pub fn read_or_default(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        match Self::read(&path) {
            Err(InventoryError::Read(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "{} not found, using default configuration",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::read_or_default(dir.path().join("config.json")).unwrap();
        assert_eq!(config.store_path, "inventoryList.json");
        assert_eq!(config.upload_dir, "uploads");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "title": "Lab 3 gear", "store_path": "data/lab3.json" }"#).unwrap();

        let config = Config::read_or_default(&path).unwrap();

        assert_eq!(config.title, "Lab 3 gear");
        assert_eq!(config.store_path, "data/lab3.json");
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "title = 'toml?'").unwrap();

        assert!(matches!(
            Config::read_or_default(&path),
            Err(InventoryError::Parse(_))
        ));
    }

    #[test]
    fn port_defaults_to_5000_and_reads_env() {
        let command = StartArgs::command();
        let port = command
            .get_arguments()
            .find(|arg| arg.get_id() == "port")
            .unwrap();

        let defaults: Vec<_> = port
            .get_default_values()
            .iter()
            .map(|value| value.to_string_lossy().into_owned())
            .collect();
        assert_eq!(defaults, ["5000"]);
        assert_eq!(port.get_env().and_then(|env| env.to_str()), Some("PORT"));
    }

    #[test]
    fn explicit_port_flag_wins() {
        let args = StartArgs::try_parse_from(["gearledger", "--port", "8080"]).unwrap();
        assert_eq!(args.port, 8080);
        assert_eq!(args.address, "0.0.0.0");
    }
}
