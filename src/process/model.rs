// ABOUTME: Concrete process, project, step, user and property types with named accessors
// ABOUTME: Each type maps accessor names to fields through a compile-time match

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::template::{Accessible, Value};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(default)]
    pub id: i64,
    pub titel: String,
    #[serde(default)]
    pub projekt: Option<Project>,
    #[serde(default)]
    pub schritte: Vec<Step>,
    #[serde(default, alias = "properties")]
    pub eigenschaften: Vec<ProcessProperty>,
    #[serde(default)]
    pub erstellungsdatum: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ist_template: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: i64,
    pub titel: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub id: i64,
    pub titel: String,
    #[serde(default)]
    pub reihenfolge: i32,
    #[serde(default)]
    pub bearbeitungsstatus: StepStatus,
    #[serde(default)]
    pub bearbeitungsbenutzer: Option<User>,
    #[serde(default)]
    pub bearbeitungsbeginn: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bearbeitungsende: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepStatus {
    #[default]
    Locked,
    Open,
    Inwork,
    Done,
    Error,
    Deactivated,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub vorname: String,
    #[serde(default)]
    pub nachname: String,
    #[serde(default)]
    pub standort: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessProperty {
    #[serde(alias = "titel")]
    pub name: String,
    #[serde(default, alias = "wert")]
    pub value: String,
}

impl Process {
    /// Parse a process snapshot from YAML
    pub fn from_yaml(content: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(content)
    }

    /// Load a process snapshot from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_yaml(&content)?)
    }

    pub fn project_title(&self) -> Option<&str> {
        self.projekt.as_ref().map(|project| project.titel.as_str())
    }

    pub fn property(&self, name: &str) -> Option<&ProcessProperty> {
        self.eigenschaften.iter().find(|property| property.name == name)
    }

    /// Step with the given title, if any
    pub fn step(&self, titel: &str) -> Option<&Step> {
        self.schritte.iter().find(|step| step.titel == titel)
    }
}

impl StepStatus {
    /// Numeric status code stored by the workflow database
    pub fn value(&self) -> i32 {
        match self {
            StepStatus::Locked => 0,
            StepStatus::Open => 1,
            StepStatus::Inwork => 2,
            StepStatus::Done => 3,
            StepStatus::Error => 4,
            StepStatus::Deactivated => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Locked => "LOCKED",
            StepStatus::Open => "OPEN",
            StepStatus::Inwork => "INWORK",
            StepStatus::Done => "DONE",
            StepStatus::Error => "ERROR",
            StepStatus::Deactivated => "DEACTIVATED",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl User {
    /// "Nachname, Vorname"
    pub fn nach_vorname(&self) -> String {
        format!("{}, {}", self.nachname, self.vorname)
    }
}

fn date_value(date: Option<&DateTime<Utc>>) -> Value<'static> {
    date.map_or(Value::Null, |date| {
        Value::owned_text(date.format(DATE_FORMAT).to_string())
    })
}

impl Accessible for Process {
    fn access(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "id" => Value::from(self.id),
            "titel" => Value::from(&self.titel),
            "projekt" => Value::optional_object(self.projekt.as_ref()),
            "schritte" => Value::list(self.schritte.iter().map(Value::object)),
            "eigenschaften" | "properties" => {
                Value::list(self.eigenschaften.iter().map(Value::object))
            }
            "erstellungsdatum" => date_value(self.erstellungsdatum.as_ref()),
            "istTemplate" => Value::from(self.ist_template),
            _ => return None,
        };
        Some(value)
    }

    fn type_name(&self) -> &'static str {
        "Process"
    }

    fn render(&self) -> String {
        self.titel.clone()
    }
}

impl Accessible for Project {
    fn access(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "id" => Some(Value::from(self.id)),
            "titel" => Some(Value::from(&self.titel)),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        "Project"
    }

    fn render(&self) -> String {
        self.titel.clone()
    }
}

impl Accessible for Step {
    fn access(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "id" => Value::from(self.id),
            "titel" => Value::from(&self.titel),
            "reihenfolge" => Value::from(self.reihenfolge),
            "bearbeitungsstatus" => Value::from(self.bearbeitungsstatus.value()),
            "bearbeitungsstatusEnum" => Value::text(self.bearbeitungsstatus.as_str()),
            "bearbeitungsbenutzer" => Value::optional_object(self.bearbeitungsbenutzer.as_ref()),
            "bearbeitungsbeginn" => date_value(self.bearbeitungsbeginn.as_ref()),
            "bearbeitungsende" => date_value(self.bearbeitungsende.as_ref()),
            _ => return None,
        };
        Some(value)
    }

    fn type_name(&self) -> &'static str {
        "Step"
    }

    fn render(&self) -> String {
        self.titel.clone()
    }
}

impl Accessible for User {
    fn access(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "id" => Value::from(self.id),
            "login" => Value::from(&self.login),
            "vorname" => Value::from(&self.vorname),
            "nachname" => Value::from(&self.nachname),
            "nachVorname" => Value::owned_text(self.nach_vorname()),
            "standort" => Value::from(self.standort.as_ref()),
            "email" => Value::from(self.email.as_ref()),
            _ => return None,
        };
        Some(value)
    }

    fn type_name(&self) -> &'static str {
        "User"
    }

    fn render(&self) -> String {
        self.nach_vorname()
    }
}

impl Accessible for ProcessProperty {
    fn access(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "propertyName" | "name" => Some(Value::from(&self.name)),
            "propertyValue" | "value" => Some(Value::from(&self.value)),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        "ProcessProperty"
    }

    fn render(&self) -> String {
        self.value.clone()
    }
}
