//! CLI configuration, stored as TOML

use std::path::{Path, PathBuf};

use anyhow::Context;
use lineage_core::generation::DEFAULT_BASELINE;
use lineage_core::validation::{DEFAULT_MAX_LIFESPAN, DEFAULT_MIN_PARENT_AGE};
use lineage_core::{ColorBy, GenerationMode, GenerationOptions, RenderOptions, ValidationConfig};
use serde::{Deserialize, Serialize};

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lineage")
}

/// Default config file location
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lineage")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database directory; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub default_tree: String,
    pub min_parent_age: i32,
    /// 0 disables the lifespan plausibility check
    pub max_lifespan: i32,
    pub generation_baseline: i32,
    pub generation_mode: GenerationMode,
    pub color_by: ColorBy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_tree: "default".to_string(),
            min_parent_age: DEFAULT_MIN_PARENT_AGE,
            max_lifespan: DEFAULT_MAX_LIFESPAN,
            generation_baseline: DEFAULT_BASELINE,
            generation_mode: GenerationMode::default(),
            color_by: ColorBy::default(),
        }
    }
}

impl Config {
    /// Load the config file; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "data_dir",
            "default_tree",
            "min_parent_age",
            "max_lifespan",
            "generation_baseline",
            "generation_mode",
            "color_by",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "data_dir" => self.data_dir().display().to_string(),
            "default_tree" => self.default_tree.clone(),
            "min_parent_age" => self.min_parent_age.to_string(),
            "max_lifespan" => self.max_lifespan.to_string(),
            "generation_baseline" => self.generation_baseline.to_string(),
            "generation_mode" => self.generation_mode.as_str().to_string(),
            "color_by" => self.color_by.as_str().to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "default_tree" => {
                lineage_core::FamilyTree::check_name(value)?;
                self.default_tree = value.to_string();
            }
            "min_parent_age" => self.min_parent_age = parse_non_negative(key, value)?,
            "max_lifespan" => self.max_lifespan = parse_non_negative(key, value)?,
            "generation_baseline" => {
                self.generation_baseline = value
                    .parse()
                    .with_context(|| format!("{} must be an integer", key))?
            }
            "generation_mode" => self.generation_mode = value.parse()?,
            "color_by" => self.color_by = value.parse()?,
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig::default()
            .with_min_parent_age(self.min_parent_age)
            .with_max_lifespan((self.max_lifespan > 0).then_some(self.max_lifespan))
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::default()
            .with_baseline(self.generation_baseline)
            .with_mode(self.generation_mode)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            color_by: self.color_by,
            ..RenderOptions::default()
        }
    }
}

fn parse_non_negative(key: &str, value: &str) -> anyhow::Result<i32> {
    let parsed: i32 = value
        .parse()
        .with_context(|| format!("{} must be an integer", key))?;
    if parsed < 0 {
        anyhow::bail!("{} cannot be negative", key);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.validation_config().max_lifespan, Some(120));
    }

    #[test]
    fn test_set_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("default_tree", "asher").unwrap();
        config.set("generation_mode", "preserve").unwrap();
        config.set("color_by", "gender").unwrap();
        config.set("max_lifespan", "0").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.get("generation_mode").as_deref(), Some("preserve"));
        assert_eq!(loaded.validation_config().max_lifespan, None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("min_parent_age", "-3").is_err());
        assert!(config.set("color_by", "rainbow").is_err());
        assert!(config.set("default_tree", "has space").is_err());
        assert!(config.set("favourite", "x").is_err());
        assert!(config.get("favourite").is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_tree = \"cohen\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_tree, "cohen");
        assert_eq!(config.min_parent_age, DEFAULT_MIN_PARENT_AGE);
    }
}
