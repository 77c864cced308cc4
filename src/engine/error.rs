// ABOUTME: Error types for property generation runs
// ABOUTME: Names the property whose expansion or persistence aborted the run

use thiserror::Error;

use crate::parser::ParserError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Property generation failed: {property} - {source}")]
    PropertyFailed {
        property: String,
        #[source]
        source: TemplateError,
    },

    #[error("Failed to store property {property}: {source}")]
    StoreFailed {
        property: String,
        #[source]
        source: StoreError,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ParserError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct StoreError {
    pub reason: String,
}

impl StoreError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ExecutionError {
    /// Name of the property that aborted the run, if the failure belongs to one
    pub fn property(&self) -> Option<&str> {
        match self {
            ExecutionError::PropertyFailed { property, .. }
            | ExecutionError::StoreFailed { property, .. } => Some(property),
            ExecutionError::ConfigurationError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
