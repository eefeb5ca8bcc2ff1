use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::order_item::Language;

// ============================================================================
// Configuration
// ============================================================================
//
// Sources, later ones override earlier ones:
// 1. AppConfig::default()
// 2. TOML file (explicit path, or order_items.toml in the working directory)
// 3. ORDER_ITEMS_* environment variables, "__" separates nested keys
//    (e.g. ORDER_ITEMS_SERVICE__PRICING_FAILURE=reject)
//
// ============================================================================

pub const DEFAULT_CONFIG_FILENAME: &str = "order_items.toml";
pub const CONFIG_ENV_PREFIX: &str = "ORDER_ITEMS_";

/// What to do when the pricing service fails while an item is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingFailurePolicy {
    /// Price the item at zero and log a warning
    #[default]
    Zero,
    /// Abort the build with a pricing error
    Reject,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub pricing_failure: PricingFailurePolicy,
    pub default_language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive used when RUST_LOG is not set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,order_item_service=debug".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let path = self
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));

        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Toml::file(&path));
        } else if self.config_path.is_some() {
            // An explicit path that does not exist is worth a warning, the default one is not
            tracing::warn!(path = %path.display(), "Configuration file not found, using defaults");
        }

        figment = figment.merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        Ok(config)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::new().load().unwrap();
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.service.pricing_failure, PricingFailurePolicy::Zero);
            assert_eq!(config.service.default_language, Language::En);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILENAME,
                r#"
                [service]
                pricing_failure = "reject"
                default_language = "ru"
                "#,
            )?;

            let config = ConfigLoader::new().load().unwrap();
            assert_eq!(config.service.pricing_failure, PricingFailurePolicy::Reject);
            assert_eq!(config.service.default_language, Language::Ru);
            assert_eq!(config.logging, LoggingConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [service]
                pricing_failure = "reject"

                [logging]
                filter = "warn"
                "#,
            )?;
            jail.set_env("ORDER_ITEMS_SERVICE__PRICING_FAILURE", "zero");

            let config = ConfigLoader::new()
                .with_config_path("custom.toml")
                .load()
                .unwrap();
            assert_eq!(config.service.pricing_failure, PricingFailurePolicy::Zero);
            assert_eq!(config.logging.filter, "warn");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_policy_is_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("ORDER_ITEMS_SERVICE__PRICING_FAILURE", "sometimes");
            assert!(ConfigLoader::new().load().is_err());
            Ok(())
        });
    }
}
