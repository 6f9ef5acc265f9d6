use std::env;
use std::path::PathBuf;

/// Path to a JSON rule table file.
pub const RULES_PATH_ENV: &str = "NAME_RULES_PATH";

/// Extra acronyms, `;`-separated, merged into the loaded tables.
pub const EXTRA_ACRONYMS_ENV: &str = "NAME_EXTRA_ACRONYMS";

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `delimiter`: The character to split the environment variable's value by.
///
/// # Returns
/// - `Vec<String>`, empty when the variable is unset or blank
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rule table path from `NAME_RULES_PATH`, if set and non-blank.
pub fn rules_path() -> Option<PathBuf> {
    env::var(RULES_PATH_ENV)
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}
