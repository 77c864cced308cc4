// ABOUTME: Ordered regex find/replace rules applied after placeholder expansion
// ABOUTME: Compiles patterns lazily and translates host-style group references

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Result, TemplateError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexRule {
    pub pattern: String,
    pub replacement: String,
}

impl RegexRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Compile the pattern and check the replacement against its groups
    pub fn compile(&self) -> Result<(Regex, String)> {
        let regex = Regex::new(&self.pattern).map_err(|source| TemplateError::InvalidPattern {
            pattern: self.pattern.clone(),
            source,
        })?;
        let replacement = translate_replacement(&self.replacement, &regex)?;
        Ok((regex, replacement))
    }

    /// Replace every match of the pattern in `value`
    pub fn apply(&self, value: &str) -> Result<String> {
        let (regex, replacement) = self.compile()?;
        Ok(regex.replace_all(value, replacement.as_str()).into_owned())
    }
}

/// Apply `rules` in order, each one seeing the previous rule's output
pub fn apply_all(value: &str, rules: &[RegexRule]) -> Result<String> {
    rules.iter().try_fold(value.to_string(), |current, rule| {
        let replaced = rule.apply(&current)?;
        debug!(
            "Rule '{}' -> '{}' turned '{}' into '{}'",
            rule.pattern, rule.replacement, current, replaced
        );
        Ok(replaced)
    })
}

/// Translate a `$1` / `${name}` / `\x` replacement into the regex crate's syntax.
///
/// Numbered references consume digits greedily while the number still names an
/// existing group, so `$10` means group 1 followed by `0` unless there are ten groups.
fn translate_replacement(replacement: &str, regex: &Regex) -> Result<String> {
    let invalid = |reason: String| TemplateError::InvalidReplacement {
        replacement: replacement.to_string(),
        reason,
    };

    let group_count = regex.captures_len() - 1;
    let mut translated = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('$') => translated.push_str("$$"),
                Some(escaped) => translated.push(escaped),
                None => return Err(invalid("trailing escape character".to_string())),
            },
            '$' => match chars.peek().copied() {
                Some('{') => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unterminated group name".to_string())),
                        }
                    }
                    if !regex.capture_names().flatten().any(|n| n == name) {
                        return Err(invalid(format!("no group named '{}'", name)));
                    }
                    translated.push_str(&format!("${{{}}}", name));
                }
                Some(first) if first.is_ascii_digit() => {
                    chars.next();
                    let mut group = first.to_digit(10).unwrap_or_default() as usize;
                    if group > group_count {
                        return Err(invalid(format!("no group {}", group)));
                    }
                    while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(10)) {
                        let candidate = group * 10 + digit as usize;
                        if candidate > group_count {
                            break;
                        }
                        group = candidate;
                        chars.next();
                    }
                    translated.push_str(&format!("${{{}}}", group));
                }
                _ => return Err(invalid("illegal group reference".to_string())),
            },
            other => translated.push(other),
        }
    }

    Ok(translated)
}
