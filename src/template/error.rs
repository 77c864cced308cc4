// ABOUTME: Error types for path evaluation and template expansion
// ABOUTME: Covers accessor lookup, list indexing, regex rules and placeholder resolution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("No accessor '{accessor}' on {type_name}")]
    NoAccessor { accessor: String, type_name: String },

    #[error("Accessor '{accessor}' is indexed but returned {found}, not a list")]
    IndexOnNonSequence { accessor: String, found: String },

    #[error("Index {index} out of range for '{accessor}' (length {len})")]
    IndexOutOfRange {
        accessor: String,
        index: usize,
        len: usize,
    },

    #[error("Malformed index in path segment '{segment}'")]
    MalformedIndex { segment: String },

    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid replacement '{replacement}': {reason}")]
    InvalidReplacement { replacement: String, reason: String },

    #[error("Failed to resolve placeholder '{{{{{placeholder}}}}}': {source}")]
    PlaceholderResolution {
        placeholder: String,
        #[source]
        source: Box<TemplateError>,
    },

    #[error("Placeholder '{{{{{placeholder}}}}}' keeps reappearing after substitution")]
    PlaceholderExpansionLoop { placeholder: String },
}

impl TemplateError {
    /// The innermost error, unwrapping placeholder context
    pub fn root_cause(&self) -> &TemplateError {
        match self {
            TemplateError::PlaceholderResolution { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
