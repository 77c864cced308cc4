// ABOUTME: Property definitions parsed from raw configuration entries
// ABOUTME: Keeps configuration order and defaults missing rule attributes to empty strings

use serde::{Deserialize, Serialize};

use super::error::{ParserError, Result};
use crate::template::{Accessible, RegexRule, TemplateExpander, VariableReplacer};

/// One `property` entry as written in the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPropertyEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub replace: Vec<RawReplaceEntry>,
}

/// One `replace` child of a property entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReplaceEntry {
    #[serde(default)]
    pub regex: String,
    #[serde(default)]
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub template: String,
    pub rules: Vec<RegexRule>,
}

impl RawPropertyEntry {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            value: Some(value.to_string()),
            replace: Vec::new(),
        }
    }

    pub fn with_replace(mut self, regex: &str, replacement: &str) -> Self {
        self.replace.push(RawReplaceEntry {
            regex: regex.to_string(),
            replacement: replacement.to_string(),
        });
        self
    }
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, template: impl Into<String>, rules: Vec<RegexRule>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            rules,
        }
    }

    /// Build a definition from the entry at `position` in the configuration list
    pub fn from_entry(entry: &RawPropertyEntry, position: usize) -> Result<Self> {
        let name = entry
            .name
            .clone()
            .ok_or_else(|| ParserError::MissingField(format!("property[{}].name", position)))?;
        let template = entry.value.clone().ok_or_else(|| {
            ParserError::MissingField(format!("property[{}].value ('{}')", position, name))
        })?;

        let rules = entry
            .replace
            .iter()
            .map(|rule| RegexRule::new(rule.regex.as_str(), rule.replacement.as_str()))
            .collect();

        Ok(Self {
            name,
            template,
            rules,
        })
    }

    /// Compile every rule up front instead of when the property is generated
    pub fn check_rules(&self) -> Result<()> {
        for (position, rule) in self.rules.iter().enumerate() {
            rule.compile().map_err(|source| ParserError::InvalidRule {
                property: self.name.clone(),
                position,
                source,
            })?;
        }
        Ok(())
    }

    /// Expand this definition's template against `root`
    pub fn generate(
        &self,
        root: &dyn Accessible,
        replacer: &dyn VariableReplacer,
    ) -> crate::template::Result<String> {
        TemplateExpander::new(root).expand(&self.template, replacer, &self.rules)
    }
}

/// Parse raw entries into definitions, preserving their order
pub fn parse_definitions(entries: &[RawPropertyEntry]) -> Result<Vec<PropertyDefinition>> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| PropertyDefinition::from_entry(entry, position))
        .collect()
}
