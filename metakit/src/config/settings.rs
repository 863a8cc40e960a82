//! Configuration settings for pagination normalization

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::defaults;
use crate::error::{Error, Result};

/// Bounds and defaults applied when normalizing [`Metadata`](crate::Metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the requested one is zero or negative
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Upper clamp for the requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,

    /// Sort direction used when the requested one is empty
    #[serde(default = "default_sort_direction")]
    pub default_sort_direction: String,
}

// Default value functions for serde
fn default_page_size() -> i64 {
    defaults::PAGE_SIZE
}
fn default_max_page_size() -> i64 {
    defaults::MAX_PAGE_SIZE
}
fn default_sort_direction() -> String {
    defaults::SORT_DIRECTION.to_string()
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_sort_direction: default_sort_direction(),
        }
    }
}

impl PaginationConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PaginationConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    ///
    /// Environment variables use the `METAKIT_` prefix, for example
    /// `METAKIT_MAX_PAGE_SIZE=50`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("metakit").required(false));
        }

        // Single underscore separators would split `max_page_size` into nested keys
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: PaginationConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size < 1 {
            return Err(Error::Config(format!(
                "max_page_size must be at least 1, got {}",
                self.max_page_size
            )));
        }

        if self.default_page_size < 1 || self.default_page_size > self.max_page_size {
            return Err(Error::Config(format!(
                "default_page_size must be between 1 and max_page_size ({}), got {}",
                self.max_page_size, self.default_page_size
            )));
        }

        if self.default_sort_direction.is_empty() {
            return Err(Error::Config(
                "default_sort_direction must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PaginationConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.default_sort_direction, "asc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PaginationConfig = toml::from_str("max_page_size = 50").unwrap();
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.default_sort_direction, "asc");
    }

    #[test]
    fn test_validation_rejects_default_above_max() {
        let config = PaginationConfig {
            default_page_size: 20,
            max_page_size: 5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_page_size = 25").unwrap();
        writeln!(file, "default_sort_direction = \"desc\"").unwrap();

        let config = PaginationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.default_sort_direction, "desc");
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_page_size = \"lots\"").unwrap();

        let err = PaginationConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_merges_file_and_env() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_page_size = 5").unwrap();
        writeln!(file, "max_page_size = 40").unwrap();

        // Only this test touches METAKIT_* variables
        std::env::set_var("METAKIT_MAX_PAGE_SIZE", "50");
        let loaded = PaginationConfig::load(Some(file.path()));
        std::env::remove_var("METAKIT_MAX_PAGE_SIZE");

        let config = loaded.unwrap();
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.default_sort_direction, "asc");
    }
}
