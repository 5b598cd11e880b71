//! Category taxonomy used for classification.
//!
//! # Responsibility
//! - Hold the ordered category labels plus one fallback label.
//! - Resolve a category for analysis text by priority-ordered substring match.
//!
//! # Invariants
//! - Labels are non-empty after trimming and unique.
//! - The fallback label is non-empty and not one of the ordered labels.
//! - Label order is the match priority; it never depends on text order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default category labels, highest priority first.
pub const DEFAULT_CATEGORIES: &[&str] = &["AI应用", "跳舞", "职场英语"];
/// Default label when no category matches.
pub const DEFAULT_FALLBACK: &str = "其他";

/// Taxonomy construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// No ordered labels were given.
    Empty,
    /// A label is blank after trimming.
    BlankLabel { position: usize },
    /// The same label appears twice.
    DuplicateLabel(String),
    /// Fallback label is blank.
    BlankFallback,
    /// Fallback label collides with an ordered label.
    FallbackInCategories(String),
}

impl Display for TaxonomyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "taxonomy must contain at least one category"),
            Self::BlankLabel { position } => {
                write!(f, "taxonomy label at position {position} is blank")
            }
            Self::DuplicateLabel(label) => write!(f, "duplicate taxonomy label `{label}`"),
            Self::BlankFallback => write!(f, "fallback label cannot be blank"),
            Self::FallbackInCategories(label) => write!(
                f,
                "fallback label `{label}` must not also be an ordered category"
            ),
        }
    }
}

impl Error for TaxonomyError {}

/// Ordered category labels plus fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxonomySpec", into = "TaxonomySpec")]
pub struct Taxonomy {
    categories: Vec<String>,
    fallback: String,
}

/// Unvalidated serde shape for [`Taxonomy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaxonomySpec {
    categories: Vec<String>,
    fallback: String,
}

impl TryFrom<TaxonomySpec> for Taxonomy {
    type Error = TaxonomyError;

    fn try_from(value: TaxonomySpec) -> Result<Self, Self::Error> {
        Taxonomy::new(value.categories, value.fallback)
    }
}

impl From<Taxonomy> for TaxonomySpec {
    fn from(value: Taxonomy) -> Self {
        Self {
            categories: value.categories,
            fallback: value.fallback,
        }
    }
}

impl Taxonomy {
    /// Builds a validated taxonomy. Labels are trimmed; order is kept.
    pub fn new<I, S>(categories: I, fallback: impl Into<String>) -> Result<Self, TaxonomyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = Vec::new();
        for (position, raw) in categories.into_iter().enumerate() {
            let label: String = raw.into();
            let label = label.trim().to_string();
            if label.is_empty() {
                return Err(TaxonomyError::BlankLabel { position });
            }
            if labels.contains(&label) {
                return Err(TaxonomyError::DuplicateLabel(label));
            }
            labels.push(label);
        }
        if labels.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let fallback: String = fallback.into();
        let fallback = fallback.trim().to_string();
        if fallback.is_empty() {
            return Err(TaxonomyError::BlankFallback);
        }
        if labels.contains(&fallback) {
            return Err(TaxonomyError::FallbackInCategories(fallback));
        }

        Ok(Self {
            categories: labels,
            fallback,
        })
    }

    /// Ordered labels, highest priority first.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Whether `label` is an ordered category or the fallback.
    pub fn contains(&self, label: &str) -> bool {
        label == self.fallback || self.categories.iter().any(|c| c == label)
    }

    /// Returns the first label (in priority order) occurring in `text`, or the
    /// fallback when none does.
    ///
    /// Matching is a plain case-sensitive substring test, so text mentioning
    /// two labels resolves to the one listed earlier.
    pub fn classify(&self, text: &str) -> &str {
        self.categories
            .iter()
            .find(|label| text.contains(label.as_str()))
            .map_or(self.fallback.as_str(), String::as_str)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Taxonomy, TaxonomyError};

    #[test]
    fn classify_prefers_priority_order_over_text_order() {
        let taxonomy = Taxonomy::new(["X-topic", "Y-topic"], "other").unwrap();
        assert_eq!(taxonomy.classify("mentions Y-topic before X-topic"), "X-topic");
        assert_eq!(taxonomy.classify("only Y-topic here"), "Y-topic");
        assert_eq!(taxonomy.classify("nothing relevant"), "other");
    }

    #[test]
    fn new_rejects_duplicates_and_blank_fallback() {
        assert_eq!(
            Taxonomy::new(["a", " a "], "other").unwrap_err(),
            TaxonomyError::DuplicateLabel("a".to_string())
        );
        assert_eq!(
            Taxonomy::new(["a"], "  ").unwrap_err(),
            TaxonomyError::BlankFallback
        );
        assert_eq!(
            Taxonomy::new(Vec::<String>::new(), "other").unwrap_err(),
            TaxonomyError::Empty
        );
    }

    #[test]
    fn default_taxonomy_is_valid() {
        let taxonomy = Taxonomy::default();
        let rebuilt = Taxonomy::new(
            taxonomy.categories().to_vec(),
            taxonomy.fallback().to_string(),
        )
        .unwrap();
        assert_eq!(rebuilt, taxonomy);
        assert!(taxonomy.contains("其他"));
    }
}
