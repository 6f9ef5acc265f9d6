//! Rewrites investment-fund names as "<Manager> Asset Management".
//!
//! The manager name is found by trying, in order:
//! 1. the reversed form "open-ended fund, <manager>"
//! 2. the text before the first fund keyword ("scb growth fund" -> "scb")
//! 3. the first hyphen/comma separated part that mentions a fund or an AMC
//! 4. the whole text
//!
//! The extracted name is cleaned by the caller-supplied function, which is expected
//! to run the main pipeline with fund routing disabled.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::error::RuleError;
use super::tables::ManagerOverride;
use super::TARGET_NAMES;

pub const MANAGER_SUFFIX: &str = "Asset Management";

// Terms that mark a delimiter-separated part as the manager's part
const MANAGER_PART_TERMS: &[&str] = &["asset management", "fund", "amc"];

lazy_static! {
    static ref REVERSED_FORM: Regex = Regex::new(r"(?i)^open[-\s]?ended fund,\s*(.*)").unwrap();
    // Alternatives are tried left to right at each position
    static ref FUND_KEYWORDS: Regex = Regex::new(concat!(
        r"(?i)open[-\s]?ended fund",
        r"|mutual fund",
        r"|(?:balanced|growth|income|equity|portfolio)\s+(?:fund|plan)?",
        r"|\bfund\b",
        r"|\bfunds\b",
        r"|\basset management\b",
        r"|\bopen\b",
    ))
    .unwrap();
    static ref PART_DELIMITERS: Regex = Regex::new(r"[-,]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TRAILING_SUFFIX: Regex = Regex::new(r"(?i)\s*\basset management$").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct FundFormatter {
    // Lowercased prefixes, longest first; equal lengths keep declaration order
    overrides: Vec<ManagerOverride>,
}

impl FundFormatter {
    pub fn new(overrides: &[ManagerOverride]) -> Result<Self, RuleError> {
        let mut overrides = overrides
            .iter()
            .map(|o| {
                let prefix = o.prefix.trim().to_lowercase();
                if prefix.is_empty() || o.name.trim().is_empty() {
                    return Err(RuleError::EmptyTerm { table: "overrides" });
                }
                Ok(ManagerOverride::new(prefix, o.name.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        overrides.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Ok(Self { overrides })
    }

    pub fn overrides(&self) -> &[ManagerOverride] {
        &self.overrides
    }

    /// Override whose prefix starts the candidate manager name.
    fn prefix_override(&self, candidate: &str) -> Option<&ManagerOverride> {
        let lowered = candidate.to_lowercase();
        self.overrides
            .iter()
            .find(|o| lowered.starts_with(&o.prefix))
    }

    /// Override whose prefix appears anywhere in the text.
    fn contained_override(&self, text: &str) -> Option<&ManagerOverride> {
        let lowered = text.to_lowercase();
        self.overrides.iter().find(|o| lowered.contains(&o.prefix))
    }

    /// Format a fund name as its manager's name plus [`MANAGER_SUFFIX`].
    pub fn format(&self, text: &str, clean: &dyn Fn(&str) -> String) -> String {
        let text = WHITESPACE.replace_all(text, " ");
        let text = text.trim();

        if let Some(caps) = REVERSED_FORM.captures(text) {
            let candidate = caps.get(1).map_or("", |m| m.as_str()).trim();

            if let Some(found) = self.prefix_override(candidate) {
                debug!(
                    target: TARGET_NAMES,
                    "Reversed fund name '{}' matched override '{}'", text, found.prefix
                );
                return with_manager_suffix(&found.name);
            }

            debug!(
                target: TARGET_NAMES,
                "Reversed fund name '{}' names manager '{}'", text, candidate
            );
            return with_manager_suffix(&clean(candidate));
        }

        if let Some(keyword) = FUND_KEYWORDS.find(text) {
            if let Some(found) = self.contained_override(text) {
                debug!(
                    target: TARGET_NAMES,
                    "Fund name '{}' matched override '{}'", text, found.prefix
                );
                return with_manager_suffix(&found.name);
            }

            let candidate = text[..keyword.start()].trim();
            debug!(
                target: TARGET_NAMES,
                "Fund keyword '{}' in '{}' leaves manager '{}'",
                keyword.as_str(),
                text,
                candidate
            );
            return with_manager_suffix(&clean(candidate));
        }

        let manager_part = PART_DELIMITERS.split(text).find(|part| {
            let lowered = part.to_lowercase();
            MANAGER_PART_TERMS.iter().any(|term| lowered.contains(term))
        });
        if let Some(part) = manager_part {
            debug!(
                target: TARGET_NAMES,
                "Fund name '{}' split to manager part '{}'", text, part
            );
            return with_manager_suffix(&clean(part));
        }

        with_manager_suffix(&clean(text))
    }
}

/// Append [`MANAGER_SUFFIX`] exactly once.
pub fn with_manager_suffix(name: &str) -> String {
    let base = TRAILING_SUFFIX.replace(name.trim(), "");
    let base = base.trim();
    if base.is_empty() {
        MANAGER_SUFFIX.to_string()
    } else {
        format!("{} {}", base, MANAGER_SUFFIX)
    }
}
