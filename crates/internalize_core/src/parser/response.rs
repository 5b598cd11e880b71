//! AI response parser.
//!
//! # Responsibility
//! - Split one raw AI response into analysis text and an action block.
//! - Classify the analysis against the configured taxonomy.
//! - Extract normalized action lines for the review board.
//!
//! # Invariants
//! - Parsing never fails; malformed output takes the fallback paths.
//! - `category` is always a taxonomy label or its fallback.
//! - `raw_action_lines` is never empty.
//! - `analysis_text` is non-empty whenever the trimmed response is non-empty.

use crate::model::task_board::TaskBoard;
use crate::model::taxonomy::Taxonomy;
use crate::parser::normalize::normalize_action_line;
use log::debug;
use serde::{Deserialize, Serialize};

/// Marker opening the action block.
pub const DEFAULT_ACTION_START: &str = "---ACTION_START---";
/// Marker closing the action block.
pub const DEFAULT_ACTION_END: &str = "---ACTION_END---";
/// Task used when no action line can be extracted.
pub const DEFAULT_PLACEHOLDER_TASK: &str = "review and note one takeaway";

/// Start/end markers bounding the action block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub start: String,
    pub end: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: DEFAULT_ACTION_START.to_string(),
            end: DEFAULT_ACTION_END.to_string(),
        }
    }
}

/// Structured view of one AI response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAnalysis {
    pub analysis_text: String,
    pub category: String,
    pub raw_action_lines: Vec<String>,
    /// Whether a well-formed action block was found.
    pub has_action_block: bool,
}

impl ParsedAnalysis {
    /// Initial review board, one open item per action line.
    pub fn to_board(&self) -> TaskBoard {
        TaskBoard::from_lines(self.raw_action_lines.iter().cloned())
    }
}

/// Parser bound to one taxonomy and delimiter pair.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    taxonomy: Taxonomy,
    delimiters: Delimiters,
    placeholder: String,
}

impl ResponseParser {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            delimiters: Delimiters::default(),
            placeholder: DEFAULT_PLACEHOLDER_TASK.to_string(),
        }
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Sets the task used when extraction yields nothing. Blank values keep
    /// the current placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        if !placeholder.trim().is_empty() {
            self.placeholder = placeholder.trim().to_string();
        }
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Parses one raw response. See module invariants.
    pub fn parse(&self, raw: &str) -> ParsedAnalysis {
        let (analysis_text, category, block) = match split_action_block(raw, &self.delimiters) {
            Some(split) => {
                // Action lines never drive classification.
                let outside = split.outside_text();
                let category = self.taxonomy.classify(outside.unwrap_or_default()).to_string();
                let analysis = outside.unwrap_or_else(|| split.block.trim());
                (analysis.to_string(), category, Some(split.block))
            }
            None => {
                let analysis = raw.trim();
                let category = self.taxonomy.classify(analysis).to_string();
                (analysis.to_string(), category, None)
            }
        };

        let mut raw_action_lines: Vec<String> = block
            .map(|block| block.lines().filter_map(normalize_action_line).collect())
            .unwrap_or_default();
        if raw_action_lines.is_empty() {
            raw_action_lines.push(self.placeholder.clone());
        }

        debug!(
            "event=response_parse module=parser status=ok has_action_block={} action_lines={} analysis_chars={}",
            block.is_some(),
            raw_action_lines.len(),
            analysis_text.chars().count()
        );

        ParsedAnalysis {
            analysis_text,
            category,
            raw_action_lines,
            has_action_block: block.is_some(),
        }
    }
}

/// Parses `raw` with default delimiters and placeholder.
pub fn parse_response(raw: &str, taxonomy: &Taxonomy) -> ParsedAnalysis {
    ResponseParser::new(taxonomy.clone()).parse(raw)
}

/// Response text cut around one well-formed action block.
#[derive(Debug, PartialEq, Eq)]
struct ActionSplit<'a> {
    prefix: &'a str,
    block: &'a str,
    suffix: &'a str,
}

impl<'a> ActionSplit<'a> {
    /// Trimmed prefix, or the trimmed text after the end marker when the
    /// response opens with the start marker.
    fn outside_text(&self) -> Option<&'a str> {
        [self.prefix, self.suffix]
            .into_iter()
            .map(str::trim)
            .find(|part| !part.is_empty())
    }
}

/// Splits at the first start marker followed by an end marker. An end marker
/// appearing only before the start marker does not count.
fn split_action_block<'a>(raw: &'a str, delimiters: &Delimiters) -> Option<ActionSplit<'a>> {
    if delimiters.start.is_empty() || delimiters.end.is_empty() {
        return None;
    }
    let start = raw.find(delimiters.start.as_str())?;
    let block_start = start + delimiters.start.len();
    let end = raw[block_start..].find(delimiters.end.as_str())? + block_start;
    Some(ActionSplit {
        prefix: &raw[..start],
        block: &raw[block_start..end],
        suffix: &raw[end + delimiters.end.len()..],
    })
}

#[cfg(test)]
mod tests {
    use super::{split_action_block, ActionSplit, Delimiters};

    #[test]
    fn split_requires_end_after_start() {
        let delimiters = Delimiters::default();
        let reversed = "a ---ACTION_END--- b ---ACTION_START--- c";
        assert_eq!(split_action_block(reversed, &delimiters), None);

        let ok = "a ---ACTION_START--- b ---ACTION_END--- c";
        assert_eq!(
            split_action_block(ok, &delimiters),
            Some(ActionSplit {
                prefix: "a ",
                block: " b ",
                suffix: " c",
            })
        );
    }

    #[test]
    fn split_ignores_blank_markers() {
        let delimiters = Delimiters {
            start: String::new(),
            end: "x".to_string(),
        };
        assert_eq!(split_action_block("abc x", &delimiters), None);
    }

    #[test]
    fn outside_text_skips_empty_prefix() {
        let delimiters = Delimiters::default();
        let leading = "lead ---ACTION_START---\n- a\n---ACTION_END---\n tail ";
        let split = split_action_block(leading, &delimiters).unwrap();
        assert_eq!(split.outside_text(), Some("lead"));

        let trailing = "---ACTION_START---\n- a\n---ACTION_END---\n tail ";
        let split = split_action_block(trailing, &delimiters).unwrap();
        assert_eq!(split.outside_text(), Some("tail"));

        let bare = "  ---ACTION_START---\n- a\n---ACTION_END---";
        let split = split_action_block(bare, &delimiters).unwrap();
        assert_eq!(split.outside_text(), None);
    }
}
