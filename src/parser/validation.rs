// ABOUTME: Static checks for property definitions before any process is touched
// ABOUTME: Reports invalid regex rules, malformed placeholder paths and duplicate property names

use std::collections::HashMap;

use super::error::{Result, ValidationError};
use super::plugin_config::PluginConfig;
use super::property::PropertyDefinition;
use crate::template::{tokenize, PathExpression, Token};

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

pub struct ConfigValidator {
    strict_mode: bool,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self { strict_mode: false }
    }

    /// In strict mode warnings also make the report invalid
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Validate every section of a plugin configuration
    pub fn validate_config(&self, config: &PluginConfig) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        for section in &config.config {
            let definitions = section.definitions()?;
            self.check_definitions(&definitions, &mut report);
        }
        self.finish(&mut report);
        Ok(report)
    }

    /// Validate one ordered list of definitions
    pub fn validate(&self, definitions: &[PropertyDefinition]) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_definitions(definitions, &mut report);
        self.finish(&mut report);
        report
    }

    fn check_definitions(&self, definitions: &[PropertyDefinition], report: &mut ValidationReport) {
        self.check_duplicates(definitions, report);
        for definition in definitions {
            self.check_template(definition, report);
            self.check_rules(definition, report);
        }
    }

    fn finish(&self, report: &mut ValidationReport) {
        report.is_valid = report.errors.is_empty() && !(self.strict_mode && report.has_warnings());
    }

    /// Duplicate names are legal (last write wins) but usually a mistake
    fn check_duplicates(&self, definitions: &[PropertyDefinition], report: &mut ValidationReport) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            let count = counts.entry(definition.name.as_str()).or_insert(0);
            if *count == 0 {
                order.push(definition.name.as_str());
            }
            *count += 1;
        }

        for name in order {
            let count = counts[name];
            if count > 1 {
                report.warnings.push(
                    ValidationError::DuplicateProperty {
                        property: name.to_string(),
                        count,
                    }
                    .to_string(),
                );
            }
        }
    }

    fn check_template(&self, definition: &PropertyDefinition, report: &mut ValidationReport) {
        if definition.template.trim().is_empty() {
            report.warnings.push(
                ValidationError::EmptyTemplate {
                    property: definition.name.clone(),
                }
                .to_string(),
            );
            return;
        }

        for token in tokenize(&definition.template) {
            match token {
                Token::Literal(text) if text.contains("{{") => {
                    report.warnings.push(
                        ValidationError::UnterminatedPlaceholder {
                            property: definition.name.clone(),
                            template: definition.template.clone(),
                        }
                        .to_string(),
                    );
                }
                Token::Placeholder(inner) => {
                    if let Err(reason) = Self::check_path(inner) {
                        report.errors.push(ValidationError::InvalidPath {
                            property: definition.name.clone(),
                            placeholder: inner.to_string(),
                            reason,
                        });
                    }
                }
                Token::Literal(_) => {}
            }
        }
    }

    fn check_path(inner: &str) -> std::result::Result<(), String> {
        let path = PathExpression::parse(inner).map_err(|e| e.to_string())?;
        if path.segments().iter().any(|segment| segment.accessor.is_empty()) {
            return Err("empty accessor name".to_string());
        }
        Ok(())
    }

    fn check_rules(&self, definition: &PropertyDefinition, report: &mut ValidationReport) {
        for (position, rule) in definition.rules.iter().enumerate() {
            if let Err(error) = rule.compile() {
                report.errors.push(ValidationError::InvalidRule {
                    property: definition.name.clone(),
                    position,
                    reason: error.to_string(),
                });
            }
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
