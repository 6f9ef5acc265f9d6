use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::normalizer::NameCleaner;
use super::TARGET_NAMES;

/// A raw name next to its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedName {
    pub raw: String,
    pub canonical: String,
}

/// Clean a column of names, keeping positions. Missing values clean to "".
pub fn clean_column(cleaner: &NameCleaner, names: &[Option<String>]) -> Vec<String> {
    let cleaned: Vec<String> = names
        .iter()
        .map(|name| cleaner.normalize_opt(name.as_deref()))
        .collect();

    info!(
        target: TARGET_NAMES,
        "Cleaned {} names ({} missing)",
        cleaned.len(),
        names.iter().filter(|n| n.is_none()).count()
    );

    cleaned
}

pub fn clean_names<'a, I>(cleaner: &NameCleaner, names: I) -> Vec<CleanedName>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|raw| CleanedName {
            raw: raw.to_string(),
            canonical: cleaner.normalize(raw),
        })
        .collect()
}

/// Group raw names by canonical form for deduplication. Names that clean to ""
/// are left out; each group keeps its raw names in input order.
pub fn group_by_canonical<'a, I>(cleaner: &NameCleaner, names: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for cleaned in clean_names(cleaner, names) {
        if cleaned.canonical.is_empty() {
            continue;
        }
        groups
            .entry(cleaned.canonical)
            .or_default()
            .push(cleaned.raw);
    }

    info!(
        target: TARGET_NAMES,
        "Grouped names into {} canonical entities", groups.len()
    );

    groups
}
