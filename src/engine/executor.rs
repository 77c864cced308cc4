// ABOUTME: Property generator running every configured definition against a process
// ABOUTME: Expands, transforms and persists properties in order, stopping at the first failure

use tracing::{debug, error, info, instrument, warn};

use super::error::{ExecutionError, Result};
use super::result::{PropertyResult, RunReport};
use super::store::PropertyStore;
use crate::parser::{ConfigSection, PropertyDefinition};
use crate::template::{Accessible, VariableReplacer};

pub struct PropertyGenerator {
    definitions: Vec<PropertyDefinition>,
}

impl PropertyGenerator {
    pub fn new(definitions: Vec<PropertyDefinition>) -> Self {
        Self { definitions }
    }

    /// Build a generator from the properties of one configuration section
    pub fn from_section(section: &ConfigSection) -> Result<Self> {
        Ok(Self::new(section.definitions()?))
    }

    pub fn definitions(&self) -> &[PropertyDefinition] {
        &self.definitions
    }

    /// Generate and store every property, failing on the first error.
    ///
    /// Properties stored before the failing one stay stored.
    pub fn run(
        &self,
        root: &dyn Accessible,
        replacer: &dyn VariableReplacer,
        store: &mut dyn PropertyStore,
    ) -> Result<RunReport> {
        let (report, failure) = self.generate_all(root, replacer, store);
        match failure {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }

    /// Like `run`, but always returns the report.
    ///
    /// A failed run has outcome `Error`, the failing property marked failed and
    /// every property after it marked skipped.
    pub fn execute(
        &self,
        root: &dyn Accessible,
        replacer: &dyn VariableReplacer,
        store: &mut dyn PropertyStore,
    ) -> RunReport {
        self.generate_all(root, replacer, store).0
    }

    #[instrument(skip_all, fields(process = %root.render(), properties = self.definitions.len()))]
    fn generate_all(
        &self,
        root: &dyn Accessible,
        replacer: &dyn VariableReplacer,
        store: &mut dyn PropertyStore,
    ) -> (RunReport, Option<ExecutionError>) {
        let mut report = RunReport::new(root.render());
        let mut failure = None;

        info!("Generating {} properties", self.definitions.len());

        for definition in &self.definitions {
            if failure.is_some() {
                report.add_property_result(PropertyResult::skipped(&definition.name));
                continue;
            }

            match Self::generate_one(definition, root, replacer, store) {
                Ok(value) => {
                    info!("Property '{}' set to '{}'", definition.name, value);
                    report.add_property_result(PropertyResult::generated(&definition.name, value));
                }
                Err(e) => {
                    error!("Property '{}' failed: {}", definition.name, e);
                    report.add_property_result(PropertyResult::failed(
                        &definition.name,
                        e.to_string(),
                    ));
                    failure = Some(e);
                }
            }
        }

        report.mark_completed();
        if failure.is_some() {
            warn!(
                "Run stopped after {} of {} properties",
                report.summary.generated_properties,
                self.definitions.len()
            );
        }
        (report, failure)
    }

    fn generate_one(
        definition: &PropertyDefinition,
        root: &dyn Accessible,
        replacer: &dyn VariableReplacer,
        store: &mut dyn PropertyStore,
    ) -> Result<String> {
        debug!("Expanding '{}' from '{}'", definition.name, definition.template);

        let value = definition
            .generate(root, replacer)
            .map_err(|source| ExecutionError::PropertyFailed {
                property: definition.name.clone(),
                source,
            })?;

        store
            .save(&definition.name, &value)
            .map_err(|source| ExecutionError::StoreFailed {
                property: definition.name.clone(),
                source,
            })?;

        Ok(value)
    }
}

/// Generate `definitions` against `root` and persist them through `store`
pub fn run(
    root: &dyn Accessible,
    definitions: &[PropertyDefinition],
    replacer: &dyn VariableReplacer,
    store: &mut dyn PropertyStore,
) -> Result<RunReport> {
    PropertyGenerator::new(definitions.to_vec()).run(root, replacer, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::StoreError;
    use crate::engine::result::{PropertyStatus, RunOutcome};
    use crate::engine::store::InMemoryPropertyStore;
    use crate::process::{Process, Step, User};
    use crate::template::{IdentityReplacer, MapVariableReplacer, RegexRule, TemplateError};

    fn process() -> Process {
        Process {
            id: 17,
            titel: "00469418X".to_string(),
            schritte: vec![Step {
                titel: "Scanning".to_string(),
                bearbeitungsbenutzer: Some(User {
                    login: "jdoe".to_string(),
                    vorname: "Jane".to_string(),
                    nachname: "Doe".to_string(),
                    standort: Some("Office".to_string()),
                    ..User::default()
                }),
                ..Step::default()
            }],
            ..Process::default()
        }
    }

    #[test]
    fn test_static_property() {
        let generator =
            PropertyGenerator::new(vec![PropertyDefinition::new("Static Text", "This is static", vec![])]);
        let mut store = InMemoryPropertyStore::new();

        let report = generator
            .run(&process(), &IdentityReplacer, &mut store)
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Finish);
        assert_eq!(store.get("Static Text"), Some("This is static"));
    }

    #[test]
    fn test_match_all_rule_replaces_value() {
        let generator = PropertyGenerator::new(vec![PropertyDefinition::new(
            "X",
            "This is static",
            vec![RegexRule::new(".*", "overwritten")],
        )]);
        let mut store = InMemoryPropertyStore::new();

        generator
            .run(&process(), &IdentityReplacer, &mut store)
            .unwrap();
        assert_eq!(store.get("X"), Some("overwritten"));
    }

    #[test]
    fn test_user_location_and_variables() {
        let replacer = MapVariableReplacer::new().with_variable("site", "Göttingen");
        let generator = PropertyGenerator::new(vec![
            PropertyDefinition::new(
                "User Location",
                "{{schritte[0].bearbeitungsbenutzer.standort}}",
                vec![],
            ),
            PropertyDefinition::new("Site", "{site}: {{titel}}", vec![]),
        ]);
        let mut store = InMemoryPropertyStore::new();

        let report = generator.run(&process(), &replacer, &mut store).unwrap();
        assert_eq!(store.get("User Location"), Some("Office"));
        assert_eq!(store.get("Site"), Some("Göttingen: 00469418X"));
        assert_eq!(report.summary.generated_properties, 2);
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let generator = PropertyGenerator::new(vec![
            PropertyDefinition::new("X", "first", vec![]),
            PropertyDefinition::new("X", "second", vec![]),
        ]);
        let mut store = InMemoryPropertyStore::new();

        generator
            .run(&process(), &IdentityReplacer, &mut store)
            .unwrap();
        assert_eq!(store.get("X"), Some("second"));
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_missing_accessor_fails_run() {
        let generator = PropertyGenerator::new(vec![
            PropertyDefinition::new("Before", "ok", vec![]),
            PropertyDefinition::new("Broken", "{{doesNotExist}}", vec![]),
            PropertyDefinition::new("After", "never", vec![]),
        ]);
        let mut store = InMemoryPropertyStore::new();

        let error = generator
            .run(&process(), &IdentityReplacer, &mut store)
            .unwrap_err();

        assert_eq!(error.property(), Some("Broken"));
        match error {
            ExecutionError::PropertyFailed { source, .. } => {
                assert!(matches!(
                    source.root_cause(),
                    TemplateError::NoAccessor { accessor, .. } if accessor == "doesNotExist"
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.get("Before"), Some("ok"));
        assert_eq!(store.get("After"), None);
    }

    #[test]
    fn test_execute_reports_skipped_properties() {
        let generator = PropertyGenerator::new(vec![
            PropertyDefinition::new("Bad Rule", "x", vec![RegexRule::new("(", "")]),
            PropertyDefinition::new("After", "never", vec![]),
        ]);
        let mut store = InMemoryPropertyStore::new();

        let report = generator.execute(&process(), &IdentityReplacer, &mut store);
        assert_eq!(report.outcome, RunOutcome::Error);
        assert_eq!(report.properties[0].status, PropertyStatus::Failed);
        assert_eq!(report.properties[1].status, PropertyStatus::Skipped);
        assert!(store.properties().is_empty());
    }

    #[test]
    fn test_store_failure_names_property() {
        let generator = PropertyGenerator::new(vec![PropertyDefinition::new("X", "1", vec![])]);
        let mut store = |_: &str, _: &str| Err::<(), StoreError>(StoreError::new("read-only"));

        let error = generator
            .run(&process(), &IdentityReplacer, &mut store)
            .unwrap_err();
        assert!(matches!(error, ExecutionError::StoreFailed { ref property, .. } if property == "X"));
    }

    #[test]
    fn test_free_run_function() {
        let definitions = vec![PropertyDefinition::new("Title", "{{titel}}", vec![])];
        let mut store = InMemoryPropertyStore::new();

        run(&process(), &definitions, &IdentityReplacer, &mut store).unwrap();
        assert_eq!(store.get("Title"), Some("00469418X"));
    }
}
