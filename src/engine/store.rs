// ABOUTME: Persistence boundary for generated properties
// ABOUTME: Defines the PropertyStore trait and an in-memory upserting implementation

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::StoreError;
use crate::process::{Process, ProcessProperty};

/// Upserts a named property value for the current process
pub trait PropertyStore {
    fn save(&mut self, name: &str, value: &str) -> Result<(), StoreError>;
}

impl<F> PropertyStore for F
where
    F: FnMut(&str, &str) -> Result<(), StoreError>,
{
    fn save(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        self(name, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProperty {
    pub name: String,
    pub value: String,
}

/// Keeps one entry per name, updating in place on repeated saves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPropertyStore {
    properties: Vec<StoredProperty>,
    history: Vec<StoredProperty>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with the properties a process already carries
    pub fn for_process(process: &Process) -> Self {
        Self {
            properties: process
                .eigenschaften
                .iter()
                .map(|property| StoredProperty {
                    name: property.name.clone(),
                    value: property.value.clone(),
                })
                .collect(),
            history: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.value.as_str())
    }

    /// Current properties in insertion order
    pub fn properties(&self) -> &[StoredProperty] {
        &self.properties
    }

    /// Every save call in the order it happened
    pub fn history(&self) -> &[StoredProperty] {
        &self.history
    }

    /// Write the stored properties back onto a process
    pub fn apply_to(&self, process: &mut Process) {
        process.eigenschaften = self
            .properties
            .iter()
            .map(|property| ProcessProperty {
                name: property.name.clone(),
                value: property.value.clone(),
            })
            .collect();
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn save(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        self.history.push(StoredProperty {
            name: name.to_string(),
            value: value.to_string(),
        });

        match self.properties.iter_mut().find(|property| property.name == name) {
            Some(existing) => {
                debug!("Updating property '{}'", name);
                existing.value = value.to_string();
            }
            None => {
                debug!("Creating property '{}'", name);
                self.properties.push(StoredProperty {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}
