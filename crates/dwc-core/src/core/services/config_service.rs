//! Configuration service for managing application configuration

use crate::AppError;
use crate::storage::config::Config;
use crate::utils::validation::{validate_page_size, validate_url};
use std::path::PathBuf;

/// Configuration service for managing application configuration
pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    /// Create new ConfigService instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get configured URL
    pub fn get_url(&self) -> Option<String> {
        self.config.get_url()
    }

    /// Set URL after validating it
    pub fn set_url(&mut self, url: String) -> Result<(), AppError> {
        validate_url(&url)?;
        self.config.set_url(url.trim_end_matches('/').to_string());
        Ok(())
    }

    pub fn set_base_dir(&mut self, base_dir: String) {
        self.config.base_dir = Some(base_dir);
    }

    pub fn set_page_size(&mut self, count: u64) -> Result<(), AppError> {
        validate_page_size(count)?;
        self.config.table.count = count;
        Ok(())
    }

    /// Save configuration to file
    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }

    /// Check if URL is configured
    pub fn has_url(&self) -> bool {
        self.get_url().is_some()
    }

    /// `key = value` lines describing the effective configuration
    pub fn describe(&self) -> Vec<(String, String)> {
        let config = &self.config;
        vec![
            (
                "gateway_url".to_string(),
                self.get_url().unwrap_or_else(|| "(not set)".to_string()),
            ),
            ("base_dir".to_string(), config.base_dir().to_string()),
            ("timeout_secs".to_string(), config.timeout_secs().to_string()),
            ("table.count".to_string(), config.table.count.to_string()),
            (
                "table.sort".to_string(),
                config
                    .table
                    .sort
                    .as_ref()
                    .map(|s| format!("{} {}", s, config.table.order.as_param()))
                    .unwrap_or_else(|| "(none)".to_string()),
            ),
            ("table.id_field".to_string(), config.table.id_field.clone()),
            (
                "fields".to_string(),
                if config.fields.is_empty() {
                    "(defaults)".to_string()
                } else {
                    config
                        .fields
                        .iter()
                        .map(|f| f.key.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                },
            ),
            (
                "map".to_string(),
                format!("lat={} lng={}", config.map.lat, config.map.lng),
            ),
        ]
    }
}
