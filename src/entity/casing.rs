use std::collections::HashSet;

/// Word-level title casing aware of acronyms and lowercase function words.
#[derive(Debug, Clone, Default)]
pub struct Casing {
    // Stored uppercase
    acronyms: HashSet<String>,
    // Stored lowercase
    lower_exceptions: HashSet<String>,
}

impl Casing {
    pub fn new<A, L, S, T>(acronyms: A, lower_exceptions: L) -> Self
    where
        A: IntoIterator<Item = S>,
        L: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            acronyms: acronyms
                .into_iter()
                .map(|a| a.as_ref().to_uppercase())
                .collect(),
            lower_exceptions: lower_exceptions
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn is_acronym(&self, word: &str) -> bool {
        self.acronyms.contains(&word.to_uppercase())
    }

    fn is_lower_exception(&self, word: &str) -> bool {
        self.lower_exceptions.contains(&word.to_lowercase())
    }

    /// Title-case a whitespace-separated string. The first word is always capitalized,
    /// later function words stay lowercase.
    pub fn title_case(&self, text: &str) -> String {
        let mut words = text.split_whitespace();
        let Some(first) = words.next() else {
            return String::new();
        };

        let mut result = vec![self.capitalize_first(first)];
        result.extend(words.map(|word| {
            if self.is_lower_exception(word) {
                word.to_lowercase()
            } else {
                self.capitalize_word(word)
            }
        }));

        result.join(" ")
    }

    /// General capitalization rule: acronym, then exception word, then hyphen
    /// segments, then plain capitalization.
    pub fn capitalize_word(&self, word: &str) -> String {
        if self.is_acronym(word) {
            return word.to_uppercase();
        }
        if self.is_lower_exception(word) {
            return word.to_lowercase();
        }
        if word.contains('-') {
            return word
                .split('-')
                .map(|segment| self.capitalize_word(segment))
                .collect::<Vec<_>>()
                .join("-");
        }
        capitalize(word)
    }

    fn capitalize_first(&self, word: &str) -> String {
        if self.is_acronym(word) {
            return word.to_uppercase();
        }
        if word.contains('-') {
            return word
                .split('-')
                .map(|segment| self.capitalize_first(segment))
                .collect::<Vec<_>>()
                .join("-");
        }
        capitalize(word)
    }

    /// Re-capitalize the first token of a parenthetical group's content, leaving
    /// the remaining tokens as they are.
    pub fn capitalize_parenthetical(&self, content: &str) -> String {
        let mut words = content.split_whitespace();
        let Some(first) = words.next() else {
            return content.to_string();
        };

        std::iter::once(self.capitalize_word(first))
            .chain(words.map(str::to_string))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
