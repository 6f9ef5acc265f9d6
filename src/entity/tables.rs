//! Rule tables used by the name cleaner
//!
//! The tables are plain data: word sets, ordered pattern lists, relocation terms and
//! manager overrides. Built-in defaults live here as constants; a JSON file can replace
//! any subset of them. Tables are compiled once by [`super::NameCleaner::new`] and never
//! change afterwards.
//!
//! ## JSON layout
//! ```json
//! {
//!   "acronyms": ["HSBC", "UOB"],
//!   "lower_exceptions": ["of", "the"],
//!   "suffix_patterns": ["\\blimited\\b"],
//!   "phrase_patterns": ["\\bbranch\\b"],
//!   "relocation_terms": ["Growth"],
//!   "overrides": [{ "prefix": "kasikorn", "name": "KAsset" }]
//! }
//! ```
//! Missing keys fall back to the built-in defaults.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

use super::error::ConfigError;
use super::TARGET_NAMES;
use crate::environment::{get_env_var_as_vec, EXTRA_ACRONYMS_ENV};

pub const LOWER_EXCEPTIONS: &[&str] = &["of", "the", "and", "for", "in"];

pub const ACRONYMS: &[&str] = &[
    "ABN", "AIA", "AMC", "ANZ", "BBL", "BCP", "BNP", "BOA", "CIMB", "DBS", "ESG", "ETF",
    "HSBC", "ING", "JP", "KKP", "KTB", "KTC", "LH", "MFC", "OCBC", "PTT", "REIT", "RHB",
    "SCB", "SCBX", "SET", "SSGA", "TISCO", "TMB", "TTB", "UBS", "UK", "UOB", "US", "USA",
];

// Legal-entity suffixes. Numeric codes are removed here so the phrase table
// never sees them split around punctuation.
pub const SUFFIX_PATTERNS: &[&str] = &[
    r"\bpublic company limited\b",
    r"\bpublic co\.? ltd\.?\b",
    r"\bpcl\b",
    r"\bco\.? ltd\.?\b",
    r"\bcompany limited\b",
    r"\blimited\b",
    r"\bltd\.?\b",
    r"\bberhad\b",
    r"\binc\.?\b",
    r"\bcorp\.?\b",
    r"\bco\b",
    r"\bgroup\b",
    r"'s",
    r"\b[0-9]+(?:[/\-\s%_]*[0-9]+)+\b",
    r"\bplc\b",
    r"\bllc\b",
    r"\bag\b",
    r"\bbhd\b",
    r"\bpte\b",
    r"\bl\.?l\.?c-adr\b",
    r"\bprivate\b",
];

pub const PHRASE_PATTERNS: &[&str] = &[
    r"\bwhich is registered\b",
    r"\bregistered by\b",
    r"\bregistered\b",
    r"\bwhich is registered_equity instrument\b",
    r"\bwhich are registered\b",
    r"\band its affiliates\b",
    r"\band its affiliates,\b",
    r"\bwhich are\b",
    r"\bwho are\b",
    r"\b[0-9]+(?:[/\-\s%_]*[0-9]+)+\b",
    r"\bwho are registered\b",
    r"\blong-term\b",
    r"\blimited-legal\b",
    r"\(type a\)",
    r"\(type b\)",
    r"\(type c\)",
    r"\(public company\)",
    r"\bdr\b",
    r"\bset[0-9]\b",
    r"\bbranch\b",
    r"\bthai\sequity\b",
    r"\bequity\b",
    r"\bdividend\sequity\b",
    r"\bjumbo\b",
    r"\blong-term\sequity\b",
    r"\bdividend\b",
    r"\bindex\b",
    r"\bset[0-9]+\b",
    r"\([^)]*$",
    r"^[^(]*\)",
    r"\(\d+\)",
];

lazy_static! {
    static ref DEFAULT_TABLES: RuleTables = RuleTables {
        acronyms: ACRONYMS.iter().map(|s| s.to_string()).collect(),
        lower_exceptions: LOWER_EXCEPTIONS.iter().map(|s| s.to_string()).collect(),
        suffix_patterns: SUFFIX_PATTERNS.iter().map(|s| s.to_string()).collect(),
        phrase_patterns: PHRASE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        relocation_terms: Vec::new(),
        overrides: Vec::new(),
    };
}

/// A manager-name prefix mapped to the short name used in canonical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerOverride {
    pub prefix: String,
    pub name: String,
}

impl ManagerOverride {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    pub acronyms: BTreeSet<String>,
    pub lower_exceptions: BTreeSet<String>,
    pub suffix_patterns: Vec<String>,
    pub phrase_patterns: Vec<String>,
    pub relocation_terms: Vec<String>,
    pub overrides: Vec<ManagerOverride>,
}

impl Default for RuleTables {
    fn default() -> Self {
        DEFAULT_TABLES.clone()
    }
}

impl RuleTables {
    /// Load tables from a JSON file; keys absent from the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let tables: RuleTables =
            serde_json::from_str(&json).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            target: TARGET_NAMES,
            "Loaded rule tables from {}", path.display()
        );

        Ok(tables)
    }

    /// Merge `;`-separated acronyms from the environment into the acronym set.
    pub fn with_env_overrides(mut self) -> Self {
        let extra = get_env_var_as_vec(EXTRA_ACRONYMS_ENV, ';');
        self.acronyms.extend(
            extra
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(|s| s.to_uppercase()),
        );
        self
    }

    pub fn with_acronyms<I, S>(mut self, acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acronyms
            .extend(acronyms.into_iter().map(Into::<String>::into));
        self
    }

    pub fn with_relocation_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relocation_terms
            .extend(terms.into_iter().map(Into::<String>::into));
        self
    }

    pub fn with_override(mut self, prefix: impl Into<String>, name: impl Into<String>) -> Self {
        self.overrides.push(ManagerOverride::new(prefix, name));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let tables = RuleTables::default();
        assert!(tables.lower_exceptions.contains("of"));
        assert!(tables.acronyms.contains("HSBC"));
        assert_eq!(tables.suffix_patterns.len(), SUFFIX_PATTERNS.len());
        assert_eq!(tables.phrase_patterns.len(), PHRASE_PATTERNS.len());
        assert!(tables.relocation_terms.is_empty());
        assert!(tables.overrides.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"relocation_terms": ["Growth"], "overrides": [{{"prefix": "abc", "name": "ABC Corp"}}]}}"#
        )
        .unwrap();

        let tables = RuleTables::from_json_file(file.path()).unwrap();
        assert_eq!(tables.relocation_terms, vec!["Growth".to_string()]);
        assert_eq!(tables.overrides, vec![ManagerOverride::new("abc", "ABC Corp")]);
        assert_eq!(tables.suffix_patterns.len(), SUFFIX_PATTERNS.len());
        assert!(tables.acronyms.contains("UOB"));
    }

    #[test]
    fn test_bad_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            RuleTables::from_json_file(file.path()),
            Err(ConfigError::Json { .. })
        ));

        let missing = Path::new("/nonexistent/rules.json");
        assert!(matches!(
            RuleTables::from_json_file(missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_builders() {
        let tables = RuleTables::default()
            .with_acronyms(["XYZ"])
            .with_relocation_terms(["Growth", "Income"])
            .with_override("abc", "ABC Corp");

        assert!(tables.acronyms.contains("XYZ"));
        assert_eq!(tables.relocation_terms.len(), 2);
        assert_eq!(tables.overrides.len(), 1);
    }
}
