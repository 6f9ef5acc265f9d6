//! Relocation of marker terms into a trailing parenthetical annotation.
//!
//! "Growth Fund XYZ" with the term "Growth" becomes "Fund XYZ (Growth)". A term that
//! directly follows "for", "of" or "the" is part of a descriptive phrase ("Fund for
//! Growth") and stays where it is.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::error::RuleError;
use super::TARGET_NAMES;

lazy_static! {
    static ref GUARD_WORDS: Regex = Regex::new(r"(?i)\b(?:for|of|the)\s$").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone)]
struct Term {
    term: String,
    regex: Regex,
}

#[derive(Debug, Clone, Default)]
pub struct Relocator {
    terms: Vec<Term>,
}

impl Relocator {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, RuleError> {
        let terms = terms
            .iter()
            .map(|t| {
                let term = t.as_ref().trim();
                if term.is_empty() {
                    return Err(RuleError::EmptyTerm {
                        table: "relocation_terms",
                    });
                }
                let pattern = format!(r"\b{}\b", regex::escape(term));
                let regex = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RuleError::InvalidPattern { pattern, source })?;
                Ok(Term {
                    term: term.to_string(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { terms })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Move every unguarded term occurrence into one trailing parenthetical group.
    /// Text that already carries a parenthetical is returned untouched.
    pub fn relocate(&self, text: &str) -> String {
        if text.contains('(') && text.contains(')') {
            return text.to_string();
        }

        let mut remaining = text.to_string();
        let mut found: Vec<String> = Vec::new();

        for term in &self.terms {
            let spans: Vec<(usize, usize)> = term
                .regex
                .find_iter(&remaining)
                .filter(|m| !GUARD_WORDS.is_match(&remaining[..m.start()]))
                .map(|m| (m.start(), m.end()))
                .collect();

            let Some(&(start, end)) = spans.first() else {
                continue;
            };
            found.push(remaining[start..end].to_string());

            let mut shortened = String::with_capacity(remaining.len());
            let mut cursor = 0;
            for (start, end) in spans {
                shortened.push_str(&remaining[cursor..start]);
                cursor = end;
            }
            shortened.push_str(&remaining[cursor..]);

            debug!(
                target: TARGET_NAMES,
                "Relocating '{}' out of '{}'", term.term, remaining
            );
            remaining = shortened;
        }

        let cleaned = WHITESPACE.replace_all(&remaining, " ").trim().to_string();
        if found.is_empty() {
            cleaned
        } else {
            format!("{} ({})", cleaned, found.join(" "))
        }
    }
}
