// ABOUTME: Configuration management for the property-generator application
// ABOUTME: Handles loading configuration from files and applying environment overrides

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generic variables available to every run as `{name}` tokens
    #[serde(default)]
    pub template_vars: IndexMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub default_project: Option<String>,

    #[serde(default)]
    pub default_step: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.merge_env();
        Ok(config)
    }

    /// Find configuration file in the working directory
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("property-generator.yaml"),
            PathBuf::from("property-generator.yml"),
            PathBuf::from(".property-generator.yaml"),
            PathBuf::from(".property-generator.yml"),
        ];

        possible_paths
            .iter()
            .find(|path| path.exists())
            .cloned()
            .unwrap_or_else(|| PathBuf::from("property-generator.yaml"))
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) {
        if let Ok(level) = std::env::var("PROPERTY_GENERATOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PROPERTY_GENERATOR_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Merge additional variables into template variables
    pub fn merge_variables(&mut self, vars: IndexMap<String, String>) {
        self.template_vars.extend(vars);
    }
}
