//! Action line normalization.
//!
//! Rules, applied once and in this order at the start of a line:
//! 1. one list bullet (`-`, `*`, `+`, `•`) followed by whitespace; `-`, `+`
//!    and `•` may also touch a following letter or checkbox (`-do X`);
//! 2. one ordinal `<digits>.`, `<digits>)` or `<digits>、`, unless a digit
//!    follows directly (`3.5 hours` is kept);
//! 3. one checkbox token: `[ ]`, `[]`, `[x]`, `[X]`, `[✓]`.
//!
//! `**bold**` and `-5` style prefixes are kept intact.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+•]\s+|[-+•])").expect("valid bullet regex"));
static ORDINAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:[.)]|、)\s*").expect("valid ordinal regex"));
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[ xX✓]?\]\s*").expect("valid checkbox regex"));

/// Strips leading list markers and returns the trimmed description, or `None`
/// when nothing remains.
pub fn normalize_action_line(line: &str) -> Option<String> {
    let mut rest = line.trim_start();

    if let Some(found) = BULLET_RE.find(rest) {
        let after = &rest[found.end()..];
        let spaced = found.as_str().ends_with(char::is_whitespace);
        if spaced || after.starts_with(|c: char| c.is_alphabetic() || c == '[') {
            rest = after.trim_start();
        }
    }

    if let Some(found) = ORDINAL_RE.find(rest) {
        let after = &rest[found.end()..];
        if !after.starts_with(|c: char| c.is_ascii_digit()) {
            rest = after;
        }
    }

    if let Some(found) = CHECKBOX_RE.find(rest) {
        rest = &rest[found.end()..];
    }

    let trimmed = rest.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
