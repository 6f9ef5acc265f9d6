use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use super::casing::Casing;
use super::error::{ConfigError, RuleError};
use super::fund::FundFormatter;
use super::relocation::Relocator;
use super::rules::RuleSet;
use super::tables::RuleTables;
use super::TARGET_NAMES;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"\s*[,.;]+\s*").unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"\(([^)]+)\)").unwrap();
    static ref EMPTY_PARENS: Regex = Regex::new(r"\(\s*\)").unwrap();
}

const BY_DELIMITER: &str = " by ";

/// Where a pipeline call sits relative to the fund formatter.
///
/// The formatter cleans the manager name it extracts by calling back into the
/// pipeline with `InsideFund`. That call never routes to the formatter again, which
/// is the only thing bounding the recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundContext {
    TopLevel,
    InsideFund,
}

/// Compiled cleaning pipeline for company and fund names.
///
/// Built once from [`RuleTables`] and immutable afterwards; share it freely between
/// threads.
#[derive(Debug, Clone)]
pub struct NameCleaner {
    casing: Casing,
    suffixes: RuleSet,
    phrases: RuleSet,
    relocator: Relocator,
    funds: FundFormatter,
}

impl NameCleaner {
    pub fn new(tables: &RuleTables) -> Result<Self, RuleError> {
        let cleaner = Self {
            casing: Casing::new(&tables.acronyms, &tables.lower_exceptions),
            suffixes: RuleSet::compile(&tables.suffix_patterns)?,
            phrases: RuleSet::compile(&tables.phrase_patterns)?,
            relocator: Relocator::new(&tables.relocation_terms)?,
            funds: FundFormatter::new(&tables.overrides)?,
        };

        info!(
            target: TARGET_NAMES,
            "Name cleaner ready: {} suffix rules, {} phrase rules, {} relocation terms, {} overrides, {} acronyms",
            cleaner.suffixes.len(),
            cleaner.phrases.len(),
            cleaner.relocator.len(),
            cleaner.funds.overrides().len(),
            tables.acronyms.len()
        );

        Ok(cleaner)
    }

    /// Load tables from a JSON file and compile them.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let tables = RuleTables::from_json_file(path)?;
        Ok(Self::new(&tables)?)
    }

    /// Cleaner built from the built-in tables.
    pub fn with_defaults() -> Result<Self, RuleError> {
        Self::new(&RuleTables::default())
    }

    /// Canonical form of a possibly-missing name. Missing names clean to "".
    pub fn normalize_opt(&self, name: Option<&str>) -> String {
        name.map(|n| self.normalize(n)).unwrap_or_default()
    }

    /// Canonical form of a name.
    pub fn normalize(&self, name: &str) -> String {
        self.normalize_in(name, FundContext::TopLevel)
    }

    pub fn normalize_in(&self, name: &str, context: FundContext) -> String {
        let text = basic_normalize(name);
        let text = self.phrases.strip(&self.suffixes.strip(&text));
        let text = truncate_at_by(&text);

        if context == FundContext::TopLevel && routes_to_fund(text) {
            debug!(target: TARGET_NAMES, "Routing '{}' to fund formatter", text);
            return self.funds.format(text, &|candidate: &str| {
                self.normalize_in(candidate, FundContext::InsideFund)
            });
        }

        let text = truncate_at_hyphen(text);
        let text = self.relocator.relocate(text);
        let text = collapse_separators(&text);
        let text = self.casing.title_case(&text);
        let text = self.recapitalize_parentheticals(&text);
        let result = drop_empty_parens(&text);

        debug!(target: TARGET_NAMES, "Normalized '{}' to '{}'", name, result);
        result
    }

    /// Two names match when they share a non-empty canonical form.
    pub fn names_match(&self, name1: &str, name2: &str) -> bool {
        let norm1 = self.normalize(name1);
        !norm1.is_empty() && norm1 == self.normalize(name2)
    }

    pub fn title_case(&self, text: &str) -> String {
        self.casing.title_case(text)
    }

    pub fn relocate(&self, text: &str) -> String {
        self.relocator.relocate(text)
    }

    pub fn strip_suffixes(&self, text: &str) -> String {
        self.suffixes.strip(text)
    }

    pub fn strip_phrases(&self, text: &str) -> String {
        self.phrases.strip(text)
    }

    pub fn format_as_manager(&self, text: &str) -> String {
        self.funds.format(text, &|candidate: &str| {
            self.normalize_in(candidate, FundContext::InsideFund)
        })
    }

    fn recapitalize_parentheticals(&self, text: &str) -> String {
        PARENTHETICAL
            .replace_all(text, |caps: &regex::Captures| {
                format!("({})", self.casing.capitalize_parenthetical(&caps[1]))
            })
            .into_owned()
    }
}

/// Compatibility folding, lowercase, abbreviation and period removal, whitespace
/// collapse and edge punctuation trim.
pub fn basic_normalize(name: &str) -> String {
    let folded = name.nfkc().collect::<String>().trim().to_lowercase();
    let without_periods = collapse_abbreviations(&folded).replace('.', "");
    let collapsed = WHITESPACE.replace_all(&without_periods, " ");

    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':'))
        .to_string()
}

/// Drop the period after a single letter when another single letter and period
/// follow, so "a.b.c." becomes "abc.".
fn collapse_abbreviations(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let is_letter = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_lowercase());

    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let abbreviation_dot = c == '.'
                && i > 0
                && is_letter(i - 1)
                && (i < 2 || !is_word(chars[i - 2]))
                && is_letter(i + 1)
                && chars.get(i + 2) == Some(&'.');
            !abbreviation_dot
        })
        .map(|(_, &c)| c)
        .collect()
}

/// Keep only what follows the last " by ".
fn truncate_at_by(text: &str) -> &str {
    if text.contains(BY_DELIMITER) {
        text.rsplit(BY_DELIMITER).next().unwrap_or(text).trim()
    } else {
        text
    }
}

fn routes_to_fund(text: &str) -> bool {
    (text.contains("fund") || text.contains("open-ended fund")) && !text.contains("provident fund")
}

fn truncate_at_hyphen(text: &str) -> &str {
    match text.split_once('-') {
        Some((head, _)) => head.trim(),
        None => text,
    }
}

fn collapse_separators(text: &str) -> String {
    let separated = SEPARATORS.replace_all(text, " ");
    WHITESPACE.replace_all(separated.trim(), " ").into_owned()
}

fn drop_empty_parens(text: &str) -> String {
    let dropped = EMPTY_PARENS.replace_all(text, "");
    WHITESPACE.replace_all(dropped.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> NameCleaner {
        NameCleaner::with_defaults().unwrap()
    }

    #[test]
    fn test_basic_normalization() {
        assert_eq!(basic_normalize("  Siam   Cement. "), "siam cement");
        assert_eq!(basic_normalize("J.P. Morgan"), "jp morgan");
        assert_eq!(basic_normalize(";,: Acme :;"), "acme");
        // Full-width compatibility characters fold to ASCII
        assert_eq!(basic_normalize("ＡＢＣ Bank"), "abc bank");
    }

    #[test]
    fn test_collapse_abbreviations() {
        assert_eq!(collapse_abbreviations("a.b.c."), "abc.");
        assert_eq!(collapse_abbreviations("u.s. bank"), "us. bank");
        // Not single letters
        assert_eq!(collapse_abbreviations("co.ltd."), "co.ltd.");
        assert_eq!(collapse_abbreviations("x.y"), "x.y");
    }

    #[test]
    fn test_totality() {
        let cleaner = cleaner();
        assert_eq!(cleaner.normalize_opt(None), "");
        assert_eq!(cleaner.normalize(""), "");
        assert_eq!(cleaner.normalize("   "), "");

        let awkward = [
            "(((", ")))", "----", " by ", "by by by", "fund", "open-ended fund,",
            "()", "( )", "'s", "123-456", "...", "Fund (", ") fund", "-fund-",
            "open", "ÅÄÖ fund", "日本 Fund",
        ];
        for input in awkward {
            let _ = cleaner.normalize(input);
        }
    }

    #[test]
    fn test_suffix_erasure() {
        let result = cleaner().normalize("Example Company Limited");
        assert_eq!(result, "Example");

        let tokens: Vec<String> = result.split_whitespace().map(str::to_lowercase).collect();
        assert!(!tokens.contains(&"company".to_string()));
        assert!(!tokens.contains(&"limited".to_string()));
    }

    #[test]
    fn test_legal_suffix_variants() {
        let cleaner = cleaner();
        assert_eq!(cleaner.normalize("Siam Cement Public Company Limited"), "Siam Cement");
        assert_eq!(cleaner.normalize("ACME CO., LTD."), "Acme");
        assert_eq!(cleaner.normalize("Maybank Berhad"), "Maybank");
        assert_eq!(cleaner.normalize("Krungthai (Type A)"), "Krungthai");
        assert_eq!(cleaner.normalize("J.P. Morgan"), "JP Morgan");
    }

    #[test]
    fn test_idempotent_on_simple_names() {
        let cleaner = cleaner();
        for name in ["Siam Commercial Bank", "Bank of the East", "HSBC Holdings"] {
            let once = cleaner.normalize(name);
            assert_eq!(once, name);
            assert_eq!(cleaner.normalize(&once), once);
        }
    }

    #[test]
    fn test_fund_routing() {
        let cleaner = cleaner();

        let fund = cleaner.normalize("ABC Open-Ended Fund");
        assert_eq!(fund, "Abc Asset Management");
        assert!(!fund.to_lowercase().contains("fund"));

        let provident = cleaner.normalize("XYZ Provident Fund");
        assert_eq!(provident, "Xyz Provident Fund");
        assert!(!provident.ends_with(" Asset Management"));
    }

    #[test]
    fn test_override_precedence() {
        let tables = RuleTables::default().with_override("abc", "ABC Corp");
        let cleaner = NameCleaner::new(&tables).unwrap();

        assert_eq!(
            cleaner.normalize("ABC Open-Ended Fund, ABC Global Partners"),
            "ABC Corp Asset Management"
        );
    }

    #[test]
    fn test_reversed_fund_name() {
        assert_eq!(
            cleaner().normalize("Open-Ended Fund, Kasikorn Asset Management Co., Ltd."),
            "Kasikorn Asset Management"
        );
    }

    #[test]
    fn test_inside_fund_never_reroutes() {
        let cleaner = cleaner();
        assert_eq!(
            cleaner.normalize_in("abc fund", FundContext::InsideFund),
            "Abc Fund"
        );
        assert_eq!(cleaner.normalize("abc fund"), "Abc Asset Management");
    }

    #[test]
    fn test_by_delimiter() {
        let cleaner = cleaner();
        assert_eq!(
            cleaner.normalize("Thai Equity Fund by SCB Asset Management"),
            "SCB Asset Management"
        );
        assert_eq!(cleaner.normalize("Managed by X by Bualuang"), "Bualuang");
    }

    #[test]
    fn test_hyphen_truncation() {
        assert_eq!(cleaner().normalize("Bangkok Bank - Head Office"), "Bangkok Bank");
    }

    #[test]
    fn test_parenthetical_recapitalization() {
        let cleaner = cleaner();
        assert_eq!(
            cleaner.normalize("Bualuang (thai) Public Company Limited"),
            "Bualuang (Thai)"
        );
        assert_eq!(cleaner.normalize("Acme (12)"), "Acme");
    }

    #[test]
    fn test_relocation_in_pipeline() {
        let tables = RuleTables::default().with_relocation_terms(["Thailand"]);
        let cleaner = NameCleaner::new(&tables).unwrap();

        assert_eq!(cleaner.normalize("Siam Thailand Cement"), "Siam Cement (Thailand)");
        assert_eq!(cleaner.normalize("Bank of Thailand"), "Bank of Thailand");
    }

    #[test]
    fn test_names_match() {
        let cleaner = cleaner();
        assert!(cleaner.names_match("Example Company Limited", "EXAMPLE LTD."));
        assert!(cleaner.names_match("ABC Growth Fund", "abc open-ended fund"));
        assert!(!cleaner.names_match("", ""));
        assert!(!cleaner.names_match("Acme", "Globex"));
    }

    #[test]
    fn test_stage_accessors() {
        let cleaner = cleaner();
        assert_eq!(cleaner.title_case("bank of the east"), "Bank of the East");
        assert_eq!(cleaner.title_case("hsbc holdings"), "HSBC Holdings");
        assert_eq!(cleaner.strip_suffixes("acme ltd"), "acme ");
        assert_eq!(cleaner.strip_phrases("acme branch"), "acme ");
        assert_eq!(cleaner.relocate("acme"), "acme");
        assert_eq!(
            cleaner.format_as_manager("scb growth fund"),
            "SCB Asset Management"
        );
    }

    #[test]
    fn test_from_json_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"overrides": [{{"prefix": "abc", "name": "ABC Corp"}}]}}"#).unwrap();
        let cleaner = NameCleaner::from_json_file(file.path()).unwrap();
        assert_eq!(cleaner.normalize("ABC Growth Fund"), "ABC Corp Asset Management");

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{"suffix_patterns": ["(broken"]}}"#).unwrap();
        assert!(matches!(
            NameCleaner::from_json_file(bad.path()),
            Err(ConfigError::Rules(RuleError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NameCleaner>();

        let cleaner = cleaner();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| cleaner.normalize("Siam Cement Public Company Limited")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), "Siam Cement");
            }
        });
    }
}
