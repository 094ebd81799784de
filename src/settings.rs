use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsConfig, DEFAULT_LOW_THRESHOLD, DEFAULT_TOP_N};
use crate::catalog::DEFAULT_CATALOG_URL;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_file: String,
    pub enriched_file: String,
    pub report_file: String,
    pub catalog_url: String,
    pub catalog_timeout_secs: u64,
    pub top_products: usize,
    pub top_customers: usize,
    pub low_stock_threshold: i64,
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_file: "data/sales_data.txt".to_string(),
            enriched_file: "data/enriched_sales_data.txt".to_string(),
            report_file: "output/sales_report.txt".to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_timeout_secs: 10,
            top_products: DEFAULT_TOP_N,
            top_customers: 5,
            low_stock_threshold: DEFAULT_LOW_THRESHOLD,
            currency_symbol: "₹".to_string(),
        }
    }
}

impl Settings {
    pub fn analytics_config(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            top_n: self.top_products,
            low_threshold: self.low_stock_threshold,
        }
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("sales-analytics")
}

pub fn default_settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from `path`, or the default location. A missing or
/// unreadable file yields defaults.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_settings_path);
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("ignoring unreadable settings {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            input_file: "/tmp/sales.txt".to_string(),
            top_products: 3,
            currency_symbol: "$".to_string(),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(Some(&path));
        assert_eq!(loaded.input_file, "/tmp/sales.txt");
        assert_eq!(loaded.top_products, 3);
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings(Some(&dir.path().join("nope.json")));
        assert_eq!(s.top_products, 5);
        assert_eq!(s.low_stock_threshold, 10);
        assert_eq!(s.catalog_timeout_secs, 10);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"input_file": "/tmp/in.txt", "low_stock_threshold": 3}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.input_file, "/tmp/in.txt");
        assert_eq!(s.low_stock_threshold, 3);
        assert_eq!(s.report_file, "output/sales_report.txt");
        assert_eq!(s.analytics_config().low_threshold, 3);
    }

    #[test]
    fn test_load_ignores_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let s = load_settings(Some(&path));
        assert_eq!(s.top_customers, 5);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings(&path, &Settings::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_settings_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = save_settings(&blocker.join("settings.json"), &Settings::default()).unwrap_err();
        assert!(matches!(err, crate::error::SalesError::Io(_)));
    }
}
