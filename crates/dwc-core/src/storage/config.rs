//! Configuration management
//!
//! Settings live in `~/.config/dwc-views/config.toml`.
//! Gateway URL priority: CLI argument > DWCV_URL environment variable > config.toml

use super::Result;
use crate::api::client::{DEFAULT_BASE_DIR, DEFAULT_TIMEOUT_SECS};
use crate::core::fields::{FieldDescriptor, FieldSet};
use crate::core::map::MapFields;
use crate::core::query::{DEFAULT_PAGE_SIZE, SortOrder};
use crate::core::records_table::RecordsTableOptions;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub const URL_ENV_VAR: &str = "DWCV_URL";

/// `[table]` section
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    pub order: SortOrder,
    pub row_numbers: bool,
    pub default_value: String,
    pub id_field: String,
    pub load_on_init: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            count: DEFAULT_PAGE_SIZE,
            sort: None,
            order: SortOrder::Ascending,
            row_numbers: true,
            default_value: String::new(),
            id_field: "id".to_string(),
            load_on_init: true,
        }
    }
}

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Gateway server URL, e.g. `http://localhost:8000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub map: MapFields,
    /// Column configuration; empty means the built-in defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join("dwc-views"))
    }

    fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get URL, preferring the environment variable over the file
    pub fn get_url(&self) -> Option<String> {
        std::env::var(URL_ENV_VAR)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.gateway_url.clone())
    }

    /// Set URL
    pub fn set_url(&mut self, url: String) {
        self.gateway_url = Some(url);
    }

    pub fn base_dir(&self) -> &str {
        self.base_dir.as_deref().unwrap_or(DEFAULT_BASE_DIR)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Log file for the TUI, defaulting to `<config dir>/dwc-tui.log`
    pub fn log_file_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("dwc-tui.log")),
        }
    }

    /// Options for a records table built from the `[table]` and `[[fields]]`
    /// sections.
    pub fn records_table_options(&self) -> RecordsTableOptions {
        let fields = if self.fields.is_empty() {
            FieldSet::darwin_core_defaults().iter().cloned().collect()
        } else {
            self.fields.clone()
        };
        RecordsTableOptions {
            start: 0,
            count: self.table.count,
            default_sort: self.table.sort.clone(),
            default_order: self.table.order,
            filter: None,
            row_numbers: self.table.row_numbers,
            default_value: Value::String(self.table.default_value.clone()),
            id_field: self.table.id_field.clone(),
            linked_detail: true,
            load_on_init: self.table.load_on_init,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.gateway_url.is_none());
        assert_eq!(config.base_dir(), "/gateway/");
        assert_eq!(config.timeout_secs(), 30);
        assert_eq!(config.table.count, 25);
        assert_eq!(config.map.lat, "lat");
    }

    #[test]
    fn test_url_management() {
        let mut config = Config::default();
        config.set_url("http://example.test".to_string());
        assert_eq!(config.gateway_url, Some("http://example.test".to_string()));
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_url("http://example.test".to_string());
        config.table.count = 50;
        config.table.sort = Some("sciName_s".to_string());
        config.fields = vec![
            FieldDescriptor::new("id").with_label("ID"),
            FieldDescriptor::new("lat").with_weight(5).hidden(),
        ];

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(nonexistent_path)).expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "gateway_url = [").unwrap();

        let result = Config::load(Some(path));
        assert!(matches!(result, Err(StorageError::ConfigParseError { .. })));
    }

    #[test]
    fn test_parse_full_file() {
        let config: Config = toml::from_str(
            r#"
            gateway_url = "http://localhost:8000"
            base_dir = "/dwc/"
            timeout_secs = 5

            [table]
            count = 10
            sort = "lat"
            order = "desc"
            default_value = "-"

            [map]
            lat = "decimalLatitude"
            lng = "decimalLongitude"

            [[fields]]
            key = "id"
            label = "Catalog #"

            [[fields]]
            key = "decimalLatitude"
            displayed = false
            "#,
        )
        .unwrap();

        assert_eq!(config.base_dir(), "/dwc/");
        assert_eq!(config.map.label.as_deref(), Some("sciName_s"));

        let options = config.records_table_options();
        assert_eq!(options.count, 10);
        assert_eq!(options.default_sort.as_deref(), Some("lat"));
        assert_eq!(options.default_order, SortOrder::Descending);
        assert_eq!(options.default_value, Value::String("-".to_string()));
        assert!(options.row_numbers);
        assert_eq!(options.fields.len(), 2);
        assert!(!options.fields[1].displayed);
    }

    #[test]
    fn test_default_fields_when_unconfigured() {
        let options = Config::default().records_table_options();
        let keys: Vec<_> = options.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "sciName_s", "lng", "lat"]);
    }
}
