// ABOUTME: Generic variable replacement applied between placeholder expansion and regex rules
// ABOUTME: Defines the host-supplied replacer boundary and a map-backed {token} implementation

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Host-specific substitution pass. The core treats it as a black box.
pub trait VariableReplacer {
    fn replace(&self, input: &str) -> String;
}

impl<F> VariableReplacer for F
where
    F: Fn(&str) -> String,
{
    fn replace(&self, input: &str) -> String {
        self(input)
    }
}

/// Returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityReplacer;

impl VariableReplacer for IdentityReplacer {
    fn replace(&self, input: &str) -> String {
        input.to_string()
    }
}

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}\s]+)\}").expect("variable token pattern is valid"));

/// Replaces `{name}` tokens with values from a map. Unknown tokens are kept as written.
#[derive(Debug, Clone, Default)]
pub struct MapVariableReplacer {
    variables: IndexMap<String, String>,
}

impl MapVariableReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_variable(name, value);
        self
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn extend<I, K, V>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in variables {
            self.set_variable(name, value);
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<&String> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableReplacer for MapVariableReplacer {
    fn replace(&self, input: &str) -> String {
        VARIABLE_RE
            .replace_all(input, |caps: &Captures| match self.variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
