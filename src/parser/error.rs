// ABOUTME: Error types for plugin configuration parsing and validation
// ABOUTME: Defines specific error types for property definition loading

use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to read plugin configuration: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("No configuration section matches project '{project}' and step '{step}'")]
    NoMatchingSection { project: String, step: String },

    #[error("Invalid replace rule {position} of property '{property}': {source}")]
    InvalidRule {
        property: String,
        position: usize,
        #[source]
        source: TemplateError,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Property '{property}' is defined {count} times; the last definition wins")]
    DuplicateProperty { property: String, count: usize },

    #[error("Property '{property}' has an empty template")]
    EmptyTemplate { property: String },

    #[error("Property '{property}' has an unterminated placeholder in '{template}'")]
    UnterminatedPlaceholder { property: String, template: String },

    #[error("Property '{property}' has an invalid path in '{{{{{placeholder}}}}}': {reason}")]
    InvalidPath {
        property: String,
        placeholder: String,
        reason: String,
    },

    #[error("Property '{property}' has an invalid replace rule {position}: {reason}")]
    InvalidRule {
        property: String,
        position: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ParserError>;
