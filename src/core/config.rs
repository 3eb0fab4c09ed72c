use crate::core::converter::REFERENCE_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8082";

const DEFAULT_CURRENCIES: &[&str] = &[
    "RUB", "USD", "EUR", "GBP", "CNY", "JPY", "CHF", "KZT", "BYN", "TRY",
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_reference_currency")]
    pub reference_currency: String,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
}

fn default_reference_currency() -> String {
    REFERENCE_CURRENCY.to_string()
}

fn default_currencies() -> Vec<String> {
    DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            reference_currency: default_reference_currency(),
            currencies: default_currencies(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been set up there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "cconv", "cconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.normalize();
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Whether `code` is one of the selectable currencies.
    pub fn is_selectable(&self, code: &str) -> bool {
        self.currencies.iter().any(|c| c == code)
    }

    // Codes are compared verbatim by the converter, so keep them upper-case.
    fn normalize(&mut self) {
        self.reference_currency = self.reference_currency.trim().to_uppercase();
        for code in &mut self.currencies {
            *code = code.trim().to_uppercase();
        }
        if !self.is_selectable(&self.reference_currency) {
            self.currencies.insert(0, self.reference_currency.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com:9000"
reference_currency: "rub"
currencies:
  - usd
  - "EUR "
"#;

        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), yaml_str).unwrap();

        let config = AppConfig::load_from_path(file.path()).expect("Failed to load");
        assert_eq!(config.provider.base_url, "http://example.com:9000");
        assert_eq!(config.reference_currency, "RUB");
        assert_eq!(config.currencies, vec!["RUB", "USD", "EUR"]);
        assert!(config.is_selectable("EUR"));
        assert!(!config.is_selectable("GBP"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.reference_currency, "RUB");
        assert!(config.is_selectable("USD"));

        let config: AppConfig = serde_yaml::from_str("reference_currency: USD").unwrap();
        assert_eq!(config.reference_currency, "USD");
        assert_eq!(config.provider, ProviderConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("absent.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "currencies: {not: [a list").unwrap();
        let result = AppConfig::load_from_path(file.path());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config file")
        );
    }
}
