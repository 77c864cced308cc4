// ABOUTME: Parser module for plugin configuration and property definitions
// ABOUTME: Exports configuration loading, property definition parsing and validation

pub mod error;
pub mod plugin_config;
pub mod property;
pub mod validation;

pub use error::{ParserError, Result, ValidationError};
pub use plugin_config::{ConfigSection, PluginConfig, WILDCARD};
pub use property::{parse_definitions, PropertyDefinition, RawPropertyEntry, RawReplaceEntry};
pub use validation::{ConfigValidator, ValidationReport};
