//! Ordered deletion rules for legal suffixes and registration boilerplate.
//!
//! A [`RuleSet`] is a compiled, immutable list of case-insensitive patterns. Stripping
//! runs every rule in declaration order; each rule deletes all of its matches and hands
//! the result to the next one. Rules never look at each other's match state.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::error::RuleError;
use super::TARGET_NAMES;

// Inputs used to probe a pattern for zero-width matches at compile time
const EMPTY_MATCH_PROBES: &[&str] = &["", "a", " a ", "1", "a-b"];

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    regex: Regex,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile patterns case-insensitively, rejecting any that can match the empty string.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RuleError> {
        let rules = patterns
            .iter()
            .map(|p| compile_rule(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Delete every match of every rule, in table order.
    pub fn strip(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |acc, rule| {
            let stripped = rule.regex.replace_all(&acc, "");
            if stripped != acc {
                debug!(
                    target: TARGET_NAMES,
                    "Rule '{}' reduced '{}' to '{}'", rule.pattern, acc, stripped
                );
            }
            stripped.into_owned()
        })
    }
}

fn compile_rule(pattern: &str) -> Result<Rule, RuleError> {
    if pattern.trim().is_empty() {
        return Err(RuleError::EmptyMatch {
            pattern: pattern.to_string(),
        });
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

    let zero_width = EMPTY_MATCH_PROBES
        .iter()
        .any(|probe| regex.find_iter(probe).any(|m| m.as_str().is_empty()));
    if zero_width {
        return Err(RuleError::EmptyMatch {
            pattern: pattern.to_string(),
        });
    }

    Ok(Rule {
        pattern: pattern.to_string(),
        regex,
    })
}
