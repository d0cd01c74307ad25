use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::locator::ResourceLocator;

fn enabled() -> bool {
    true
}

/// Declarative locator setup, usually read from a TOML file:
///
/// ```toml
/// search_roots = ["assets", "/opt/app/share"]
/// global_sources = true
/// executable_dir = true
/// working_dir_fallback = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocatorConfig {
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,
    #[serde(default = "enabled")]
    pub global_sources: bool,
    #[serde(default = "enabled")]
    pub executable_dir: bool,
    #[serde(default = "enabled")]
    pub working_dir_fallback: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            search_roots: Vec::new(),
            global_sources: true,
            executable_dir: true,
            working_dir_fallback: true,
        }
    }
}

impl LocatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse locator config")
    }

    /// Reads a config file. Relative search roots are taken relative to the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read locator config {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid locator config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.search_roots = config
            .search_roots
            .iter()
            .map(|root| {
                root.absolutize_from(base)
                    .map(|abs| abs.into_owned())
                    .with_context(|| format!("Failed to absolutize search root {}", root.display()))
            })
            .collect::<Result<_>>()?;

        tracing::debug!(
            target: "resource_locator::config",
            path = %path.display(),
            roots = config.search_roots.len(),
            "Loaded locator config."
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize locator config")
    }
}

impl ResourceLocator {
    pub fn from_config(config: &LocatorConfig) -> Self {
        let mut builder = ResourceLocator::builder()
            .global_sources(config.global_sources)
            .executable_dir(config.executable_dir)
            .working_dir_fallback(config.working_dir_fallback);
        for root in &config.search_roots {
            builder = builder.search_root(root.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() -> Result<()> {
        let config = LocatorConfig::from_toml_str("")?;
        assert_eq!(config, LocatorConfig::default());
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(LocatorConfig::from_toml_str("search_root = \"typo\"").is_err());
    }

    #[test]
    fn test_load_absolutizes_relative_roots() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let assets = temp_dir.path().join("assets");
        fs::create_dir_all(&assets)?;
        fs::write(assets.join("logo.svg"), "<svg/>")?;

        let config_path = temp_dir.path().join("locator.toml");
        fs::write(
            &config_path,
            "search_roots = [\"assets\", \"/opt/app/share\"]\nexecutable_dir = false\nglobal_sources = false\n",
        )?;

        let config = LocatorConfig::load(&config_path)?;
        assert_eq!(config.search_roots, vec![assets.clone(), PathBuf::from("/opt/app/share")]);
        assert!(!config.executable_dir);
        assert!(config.working_dir_fallback);

        let locator = ResourceLocator::from_config(&config);
        assert_eq!(locator.sources().len(), 2);
        assert_eq!(locator.resolve_as_text("logo.svg").as_deref(), Some("<svg/>"));
        Ok(())
    }

    #[test]
    fn test_round_trip_through_toml() -> Result<()> {
        let config = LocatorConfig {
            search_roots: vec![PathBuf::from("/srv/res")],
            working_dir_fallback: false,
            ..LocatorConfig::default()
        };
        let parsed = LocatorConfig::from_toml_str(&config.to_toml_string()?)?;
        assert_eq!(parsed, config);
        Ok(())
    }
}
