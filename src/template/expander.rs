// ABOUTME: Three-stage template expansion: path placeholders, host variables, regex rules
// ABOUTME: Tokenizes {{...}} placeholders and substitutes them with a bounded re-scan loop guard

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use super::error::{Result, TemplateError};
use super::path;
use super::rules::{self, RegexRule};
use super::value::Accessible;
use super::variables::VariableReplacer;

/// Substituted for a placeholder whose path runs into a null value
pub const NULL_TEXT: &str = "null";

/// Upper bound on re-scan rounds before expansion is declared looping
pub const MAX_EXPANSION_ROUNDS: usize = 16;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    Literal(&'t str),
    /// Inner text of a `{{...}}` placeholder
    Placeholder(&'t str),
}

impl Token<'_> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Token::Placeholder(_))
    }
}

/// Split `template` into literal runs and placeholders, leftmost first.
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            tokens.push(Token::Literal(&template[last..whole.start()]));
        }
        tokens.push(Token::Placeholder(inner.as_str()));
        last = whole.end();
    }

    if last < template.len() {
        tokens.push(Token::Literal(&template[last..]));
    }
    tokens
}

/// Check whether a string still contains a `{{...}}` placeholder
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER_RE.is_match(text)
}

fn first_placeholder(text: &str) -> Option<String> {
    PLACEHOLDER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str().to_string())
}

/// Expands templates against one root object.
pub struct TemplateExpander<'r> {
    root: &'r dyn Accessible,
    max_rounds: usize,
}

impl<'r> TemplateExpander<'r> {
    pub fn new(root: &'r dyn Accessible) -> Self {
        Self {
            root,
            max_rounds: MAX_EXPANSION_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Run all three stages and return the final value
    pub fn expand(
        &self,
        template: &str,
        replacer: &dyn VariableReplacer,
        rules: &[RegexRule],
    ) -> Result<String> {
        let resolved = self.resolve_placeholders(template)?;
        let replaced = replacer.replace(&resolved);
        debug!("Variable replacement produced '{}'", replaced);
        rules::apply_all(&replaced, rules)
    }

    /// Substitute every `{{path}}` placeholder until none remain.
    ///
    /// Identical placeholders in one round share a single evaluation. A placeholder
    /// whose value contains that same placeholder again is a loop; longer cycles
    /// end at the round limit.
    pub fn resolve_placeholders(&self, template: &str) -> Result<String> {
        let mut working = template.to_string();

        for round in 0..self.max_rounds {
            match self.substitute_round(&working, round)? {
                Some(next) => working = next,
                None => return Ok(working),
            }
        }

        match first_placeholder(&working) {
            Some(placeholder) => Err(TemplateError::PlaceholderExpansionLoop { placeholder }),
            None => Ok(working),
        }
    }

    /// One tokenize-and-substitute pass, `None` when nothing is left to substitute
    fn substitute_round(&self, working: &str, round: usize) -> Result<Option<String>> {
        if !has_placeholders(working) {
            return Ok(None);
        }

        let mut resolved: HashMap<&str, String> = HashMap::new();
        let mut output = String::with_capacity(working.len());
        for token in tokenize(working) {
            match token {
                Token::Literal(text) => output.push_str(text),
                Token::Placeholder(inner) => {
                    if !resolved.contains_key(inner) {
                        let value = self.resolve(inner)?;
                        debug!("Round {}: {{{{{}}}}} -> '{}'", round, inner, value);
                        if tokenize(&value).contains(&Token::Placeholder(inner)) {
                            return Err(TemplateError::PlaceholderExpansionLoop {
                                placeholder: inner.to_string(),
                            });
                        }
                        resolved.insert(inner, value);
                    }
                    output.push_str(&resolved[inner]);
                }
            }
        }

        Ok(Some(output))
    }

    fn resolve(&self, inner: &str) -> Result<String> {
        path::evaluate(self.root, inner)
            .map(|value| value.unwrap_or_else(|| NULL_TEXT.to_string()))
            .map_err(|source| TemplateError::PlaceholderResolution {
                placeholder: inner.to_string(),
                source: Box::new(source),
            })
    }
}

/// Expand `template` against `root` with the given replacer and rules
pub fn expand(
    root: &dyn Accessible,
    template: &str,
    replacer: &dyn VariableReplacer,
    rules: &[RegexRule],
) -> Result<String> {
    TemplateExpander::new(root).expand(template, replacer, rules)
}
