// ABOUTME: Main library module for the property-generator
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod engine;
pub mod parser;
pub mod process;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use engine::{InMemoryPropertyStore, PropertyGenerator, PropertyStore, RunOutcome, RunReport};
pub use parser::{ConfigValidator, PluginConfig, PropertyDefinition};
pub use process::Process;
pub use template::{Accessible, TemplateExpander, VariableReplacer};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
