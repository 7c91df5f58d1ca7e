use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::{AppError, Result};

/// Word lists tried, in order, when no dictionary path is configured.
pub const SYSTEM_WORD_LISTS: &[&str] = &[
    "/usr/share/dict/words",
    "/usr/share/dict/american-english",
    "/usr/share/dict/british-english",
];

/// Answers whether a token is a known word.
pub trait Dictionary {
    fn contains(&self, word: &str) -> bool;
}

/// Case-insensitive dictionary backed by a plain word list (one word per line).
#[derive(Debug, Default)]
pub struct WordListDictionary {
    words: HashSet<String>,
}

impl WordListDictionary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Dictionary(format!("cannot read {}: {}", path.display(), e))
        })?;
        let dict = Self::from_words(content.lines());
        if dict.is_empty() {
            return Err(AppError::Dictionary(format!("{} contains no words", path.display())));
        }
        log::info!("loaded {} words from {}", dict.len(), path.display());
        Ok(dict)
    }

    /// Load the configured word list, or the first system list that exists.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            return Self::load(path);
        }
        let found = SYSTEM_WORD_LISTS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .ok_or_else(|| {
                AppError::Dictionary(
                    "no word list found; set \"dictionary_path\" in settings.json".to_string(),
                )
            })?;
        Self::load(&found)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordListDictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

/// Strip punctuation glued to either end of a token.
///
/// Apostrophes and hyphens inside the word survive ("don't", "well-known").
pub fn normalize_token(token: &str) -> Option<&str> {
    let word = token.trim_matches(|c: char| !c.is_alphanumeric());
    if word.chars().any(char::is_alphabetic) {
        Some(word)
    } else {
        None
    }
}

/// Words of `text` the dictionary doesn't know, unique ignoring case, in
/// first-seen order and spelled as first seen.
pub fn find_misspelled(text: &str, dictionary: &dyn Dictionary) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut misspelled = Vec::new();

    for word in text.split_whitespace().filter_map(normalize_token) {
        if !dictionary.contains(word) && seen.insert(word.to_lowercase()) {
            misspelled.push(word.to_string());
        }
    }
    misspelled
}

pub fn format_report(misspelled: &[String]) -> String {
    if misspelled.is_empty() {
        "No spelling errors found.".to_string()
    } else {
        format!("Incorrect Words:\n{}", misspelled.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dict(words: &[&str]) -> WordListDictionary {
        WordListDictionary::from_words(words.iter())
    }

    #[test]
    fn test_reports_unknown_word() {
        let d = dict(&["world"]);
        assert_eq!(find_misspelled("helllo world", &d), vec!["helllo".to_string()]);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let d = dict(&["Hello", "world"]);
        assert!(find_misspelled("HELLO World hello", &d).is_empty());
    }

    #[test]
    fn test_trailing_punctuation_is_ignored() {
        let d = dict(&["hello", "world", "don't"]);
        assert!(find_misspelled("Hello, world! (don't)", &d).is_empty());
    }

    #[test]
    fn test_unique_in_first_occurrence_order() {
        let d = dict(&["the"]);
        let found = find_misspelled("zeta the alpha zeta beta alpha", &d);
        assert_eq!(found, vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_case_variants_reported_once() {
        let d = dict(&["world"]);
        let found = find_misspelled("Helo helo HELO world", &d);
        assert_eq!(found, vec!["Helo"]);
    }

    #[test]
    fn test_numbers_and_symbols_are_skipped() {
        let d = dict(&["apples"]);
        assert!(find_misspelled("42 apples -- 3.14 !!!", &d).is_empty());
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("\"quoted\","), Some("quoted"));
        assert_eq!(normalize_token("well-known."), Some("well-known"));
        assert_eq!(normalize_token("..."), None);
        assert_eq!(normalize_token("2024"), None);
    }

    #[test]
    fn test_report_format() {
        assert_eq!(format_report(&[]), "No spelling errors found.");
        let words = vec!["teh".to_string(), "wrold".to_string()];
        assert_eq!(format_report(&words), "Incorrect Words:\nteh, wrold");
    }

    #[test]
    fn test_load_word_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words");
        fs::write(&path, "apple\nBanana\n\n  cherry  \n").unwrap();

        let d = WordListDictionary::load(&path).unwrap();
        assert_eq!(d.len(), 3);
        assert!(d.contains("banana"));
        assert!(d.contains("Cherry"));
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = WordListDictionary::load(&dir.path().join("missing"));
        assert!(matches!(missing, Err(AppError::Dictionary(_))));

        let empty = dir.path().join("empty");
        fs::write(&empty, "\n\n").unwrap();
        assert!(matches!(WordListDictionary::load(&empty), Err(AppError::Dictionary(_))));
    }

    #[test]
    fn test_locate_prefers_configured_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom");
        fs::write(&path, "quill\n").unwrap();
        let d = WordListDictionary::locate(Some(&path)).unwrap();
        assert!(d.contains("quill"));
    }
}
