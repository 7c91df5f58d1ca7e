use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Replace all occurrences of `search` with `replace`
///
/// Literal, case-sensitive, non-overlapping, scanned left to right.
/// An empty search string replaces nothing.
///
/// Returns (new_text, count_of_replacements)
pub fn replace_all_in_text(text: &str, search: &str, replace: &str) -> (String, usize) {
    if search.is_empty() {
        return (text.to_string(), 0);
    }

    let mut result = String::with_capacity(text.len());
    let mut count = 0;
    let mut last = 0;

    for (pos, matched) in text.match_indices(search) {
        result.push_str(&text[last..pos]);
        result.push_str(replace);
        last = pos + matched.len();
        count += 1;
    }
    result.push_str(&text[last..]);

    (result, count)
}

/// Number of whitespace-delimited, non-empty tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Exact number of characters (Unicode scalar values)
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Status bar text for the given buffer
pub fn status_line(text: &str) -> String {
    format!("Words: {} | Characters: {}", word_count(text), char_count(text))
}

/// Append `addition` to `text`, separated by a single space unless `text` is
/// empty or already ends in whitespace.
pub fn append_with_separator(text: &str, addition: &str) -> String {
    let needs_space = text.chars().last().is_some_and(|c| !c.is_whitespace());
    let mut joined = String::with_capacity(text.len() + addition.len() + 1);
    joined.push_str(text);
    if needs_space {
        joined.push(' ');
    }
    joined.push_str(addition);
    joined
}
