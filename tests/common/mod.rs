// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Builds plugin configurations and process snapshots inside temporary directories

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use property_generator::process::{Process, Project, Step, User};

pub struct TestPluginConfigBuilder {
    sections: Vec<TestSection>,
}

pub struct TestSection {
    pub project: String,
    pub step: String,
    pub properties: Vec<TestProperty>,
}

pub struct TestProperty {
    pub name: String,
    pub value: String,
    pub rules: Vec<(String, String)>,
}

impl TestProperty {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, regex: &str, replacement: &str) -> Self {
        self.rules.push((regex.to_string(), replacement.to_string()));
        self
    }
}

impl TestPluginConfigBuilder {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Start a new section; following properties are added to it
    pub fn section(mut self, project: &str, step: &str) -> Self {
        self.sections.push(TestSection {
            project: project.to_string(),
            step: step.to_string(),
            properties: Vec::new(),
        });
        self
    }

    pub fn with_property(mut self, property: TestProperty) -> Self {
        if self.sections.is_empty() {
            self = self.section("*", "*");
        }
        if let Some(section) = self.sections.last_mut() {
            section.properties.push(property);
        }
        self
    }

    pub fn add_static(self, name: &str, value: &str) -> Self {
        self.with_property(TestProperty::new(name, value))
    }

    pub fn generate_yaml(&self) -> String {
        let mut yaml = String::from("config:\n");

        for section in &self.sections {
            yaml.push_str(&format!("  - project: {}\n", quote(&section.project)));
            yaml.push_str(&format!("    step: {}\n", quote(&section.step)));
            yaml.push_str("    property:\n");
            for property in &section.properties {
                yaml.push_str(&format!("      - name: {}\n", quote(&property.name)));
                yaml.push_str(&format!("        value: {}\n", quote(&property.value)));
                if !property.rules.is_empty() {
                    yaml.push_str("        replace:\n");
                    for (regex, replacement) in &property.rules {
                        yaml.push_str(&format!("          - regex: {}\n", quote(regex)));
                        yaml.push_str(&format!("            replacement: {}\n", quote(replacement)));
                    }
                }
            }
        }

        yaml
    }

    pub async fn write_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, self.generate_yaml()).await?;
        Ok(())
    }
}

/// Single-quoted YAML scalar
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Process with one scanning step edited by a user located in "Office"
pub fn sample_process() -> Process {
    Process {
        id: 4711,
        titel: "00469418X".to_string(),
        projekt: Some(Project {
            id: 3,
            titel: "Archive".to_string(),
        }),
        schritte: vec![Step {
            id: 1,
            titel: "Scanning".to_string(),
            reihenfolge: 1,
            bearbeitungsbenutzer: Some(User {
                id: 9,
                login: "jdoe".to_string(),
                vorname: "Jane".to_string(),
                nachname: "Doe".to_string(),
                standort: Some("Office".to_string()),
                email: None,
            }),
            ..Step::default()
        }],
        ..Process::default()
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_report.json", name))
    }

    pub async fn create_plugin_config(&self, name: &str, builder: &TestPluginConfigBuilder) -> PathBuf {
        let path = self.path().join(format!("{}.yaml", name));
        builder
            .write_to_file(&path)
            .await
            .expect("Failed to write plugin config");
        path
    }

    pub async fn create_process_file(&self, name: &str, process: &Process) -> PathBuf {
        let path = self.path().join(format!("{}.yaml", name));
        let yaml = serde_yaml::to_string(process).expect("Failed to serialize process");
        fs::write(&path, yaml)
            .await
            .expect("Failed to write process file");
        path
    }
}
