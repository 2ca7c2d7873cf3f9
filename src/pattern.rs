//! Email address pattern matching

use regex::Regex;

// Permissive on purpose: the goal is recall across messy document text, not
// RFC 5321 validation. Compiled once, shared by every extraction path.
static ADDRESS_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._-]+@[a-z0-9-]+\.[a-z]{2,}").unwrap()
});

/// Find every non-overlapping address match in the full text.
#[must_use]
pub fn find_all(text: &str) -> Vec<String> {
    ADDRESS_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Find at most one address per line: the first match on each line.
///
/// Line-oriented scanning deliberately differs from [`find_all`] in
/// multiplicity — a line containing several addresses contributes only its
/// first.
#[must_use]
pub fn find_per_line(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| ADDRESS_REGEX.find(line))
        .map(|m| m.as_str().to_string())
        .collect()
}
