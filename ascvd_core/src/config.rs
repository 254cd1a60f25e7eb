//! Configuration file support for the ascvd tools.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/ascvd/config.toml`.

use crate::{Error, Horizon, Race, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub projection: ProjectionConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Which interventions a report projects, and over which horizon
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_interventions")]
    pub interventions: Vec<String>,

    #[serde(default = "default_horizon")]
    pub horizon: Horizon,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            interventions: default_interventions(),
            horizon: default_horizon(),
        }
    }
}

/// Values used when an input omits an optional field
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub race: Race,
}

/// Output format for reports
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

// Default value functions
fn default_interventions() -> Vec<String> {
    vec!["statin".into(), "sysBP".into()]
}

fn default_horizon() -> Horizon {
    Horizon::Lifetime
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::debug!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
            None => {
                tracing::debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("ascvd").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject intervention lists that contain only unknown tags
    ///
    /// Individual unknown tags are tolerated at scoring time; a config whose
    /// list resolves to nothing at all is almost certainly a typo.
    pub fn validate(&self) -> Result<()> {
        let tags = &self.projection.interventions;
        if !tags.is_empty() && crate::projection::parse_interventions(tags).is_empty() {
            return Err(Error::Config(format!(
                "no recognized interventions in {:?}",
                tags
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.projection.interventions, vec!["statin", "sysBP"]);
        assert_eq!(config.projection.horizon, Horizon::Lifetime);
        assert_eq!(config.defaults.race, Race::Other);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.projection.interventions,
            parsed.projection.interventions
        );
        assert_eq!(config.projection.horizon, parsed.projection.horizon);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[projection]
horizon = "ten"

[output]
format = "json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.projection.horizon, Horizon::Ten);
        assert_eq!(config.projection.interventions, vec!["statin", "sysBP"]); // default
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_and_save_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.defaults.race = Race::Black;
        config.projection.interventions = vec!["aspirin".into()];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.defaults.race, Race::Black);
        assert_eq!(loaded.projection.interventions, vec!["aspirin"]);
    }

    #[test]
    fn test_rejects_all_unknown_interventions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[projection]\ninterventions = [\"Statin\", \"yoga\"]\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"yaml\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }
}
