// ABOUTME: Plugin configuration file with per-project and per-step sections
// ABOUTME: Selects the most specific section for a project/step pair and parses its properties

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::error::{ParserError, Result};
use super::property::{parse_definitions, PropertyDefinition, RawPropertyEntry};

/// Matches any project or step
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub config: Vec<ConfigSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSection {
    #[serde(default = "wildcard", deserialize_with = "one_or_many")]
    pub project: Vec<String>,
    #[serde(default = "wildcard", deserialize_with = "one_or_many")]
    pub step: Vec<String>,
    #[serde(default)]
    pub property: Vec<RawPropertyEntry>,
}

fn wildcard() -> Vec<String> {
    vec![WILDCARD.to_string()]
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

impl ConfigSection {
    /// Specificity of this section for the pair, or `None` if it does not apply.
    ///
    /// Exact project and step rank highest, then exact project, then exact step,
    /// then the full wildcard.
    fn rank(&self, project: &str, step: &str) -> Option<u8> {
        let project_exact = self.project.iter().any(|p| p == project);
        let project_any = self.project.iter().any(|p| p == WILDCARD);
        let step_exact = self.step.iter().any(|s| s == step);
        let step_any = self.step.iter().any(|s| s == WILDCARD);

        match (project_exact, step_exact) {
            (true, true) => Some(3),
            (true, false) if step_any => Some(2),
            (false, true) if project_any => Some(1),
            _ if project_any && step_any => Some(0),
            _ => None,
        }
    }

    pub fn definitions(&self) -> Result<Vec<PropertyDefinition>> {
        parse_definitions(&self.property)
    }
}

impl PluginConfig {
    /// Parse plugin configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: PluginConfig = serde_yaml::from_str(content).map_err(ParserError::YamlError)?;
        if config.config.is_empty() {
            return Err(ParserError::InvalidFormat(
                "at least one config section is required".to_string(),
            ));
        }
        Ok(config)
    }

    /// Parse plugin configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ParserError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Async variant of `from_file` used by the CLI
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ParserError::IoError)?;
        Self::from_yaml(&content)
    }

    /// The most specific section for a project/step pair. Earlier sections win ties.
    pub fn section_for(&self, project: &str, step: &str) -> Result<&ConfigSection> {
        let mut best: Option<(u8, &ConfigSection)> = None;
        for section in &self.config {
            if let Some(rank) = section.rank(project, step) {
                if best.map_or(true, |(best_rank, _)| rank > best_rank) {
                    best = Some((rank, section));
                }
            }
        }

        best.map(|(rank, section)| {
            debug!(
                "Using config section {:?}/{:?} (rank {}) for project '{}', step '{}'",
                section.project, section.step, rank, project, step
            );
            section
        })
        .ok_or_else(|| ParserError::NoMatchingSection {
            project: project.to_string(),
            step: step.to_string(),
        })
    }

    /// Parse the property definitions configured for a project/step pair
    pub fn definitions_for(&self, project: &str, step: &str) -> Result<Vec<PropertyDefinition>> {
        self.section_for(project, step)?.definitions()
    }
}
