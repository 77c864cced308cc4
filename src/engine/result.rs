// ABOUTME: Per-property results and run-level reports for property generation
// ABOUTME: Tracks generated values, the failing property and the host-facing run outcome

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyStatus {
    Generated,
    Failed,
    Skipped,
}

/// Value the host step reports back to the workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunOutcome {
    Finish,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyResult {
    pub name: String,
    pub status: PropertyStatus,
    pub value: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub process: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub outcome: RunOutcome,
    pub properties: Vec<PropertyResult>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_properties: usize,
    pub generated_properties: usize,
    pub failed_properties: usize,
    pub skipped_properties: usize,
}

impl PropertyResult {
    pub fn generated(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            status: PropertyStatus::Generated,
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            status: PropertyStatus::Failed,
            value: None,
            error: Some(error),
        }
    }

    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: PropertyStatus::Skipped,
            value: None,
            error: None,
        }
    }
}

impl RunReport {
    pub fn new(process: String) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            process,
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            outcome: RunOutcome::Finish,
            properties: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn add_property_result(&mut self, result: PropertyResult) {
        self.properties.push(result);
    }

    pub fn mark_completed(&mut self) {
        let end_time = Utc::now();
        self.end_time = Some(end_time);
        self.duration = Some((end_time - self.start_time).to_std().unwrap_or(Duration::ZERO));
        self.outcome = if self.has_failures() {
            RunOutcome::Error
        } else {
            RunOutcome::Finish
        };
        self.update_summary();
    }

    /// Value generated for `name`. With duplicate names the last one is returned.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .filter(|result| result.name == name)
            .find_map(|result| result.value.as_deref())
    }

    pub fn has_failures(&self) -> bool {
        self.properties
            .iter()
            .any(|result| result.status == PropertyStatus::Failed)
    }

    fn update_summary(&mut self) {
        let count = |status: PropertyStatus| {
            self.properties
                .iter()
                .filter(|result| result.status == status)
                .count()
        };

        self.summary = RunSummary {
            total_properties: self.properties.len(),
            generated_properties: count(PropertyStatus::Generated),
            failed_properties: count(PropertyStatus::Failed),
            skipped_properties: count(PropertyStatus::Skipped),
        };
    }
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyStatus::Generated => write!(f, "generated"),
            PropertyStatus::Failed => write!(f, "failed"),
            PropertyStatus::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Finish => write!(f, "finish"),
            RunOutcome::Error => write!(f, "error"),
        }
    }
}
