// ABOUTME: Template module for {{path}} placeholder expansion over process object graphs
// ABOUTME: Provides the path evaluator, regex rule engine, variable replacer boundary and expander

pub mod error;
pub mod expander;
pub mod path;
pub mod rules;
pub mod value;
pub mod variables;

pub use error::{Result, TemplateError};
pub use expander::{expand, tokenize, TemplateExpander, Token, MAX_EXPANSION_ROUNDS, NULL_TEXT};
pub use path::{evaluate, PathExpression, PathSegment};
pub use rules::{apply_all, RegexRule};
pub use value::{Accessible, Value};
pub use variables::{IdentityReplacer, MapVariableReplacer, VariableReplacer};
