use internalize_core::{parse_response, Delimiters, ResponseParser, Taxonomy};

fn topics() -> Taxonomy {
    Taxonomy::new(["X-topic", "Y-topic"], "other").unwrap()
}

#[test]
fn well_formed_markers_split_analysis_and_actions() {
    let raw = "A. B. ---ACTION_START---\n1. do X\n2. do Y\n---ACTION_END---";
    let parsed = parse_response(raw, &topics());

    assert_eq!(parsed.analysis_text, "A. B.");
    assert_eq!(parsed.raw_action_lines, vec!["do X", "do Y"]);
    assert_eq!(parsed.category, "other");
    assert!(parsed.has_action_block);
}

#[test]
fn missing_markers_keep_whole_text_and_use_placeholder() {
    let raw = "  Outline about Y-topic.\n1. do X\n  ";
    let parsed = parse_response(raw, &topics());

    assert_eq!(parsed.analysis_text, "Outline about Y-topic.\n1. do X");
    assert_eq!(parsed.raw_action_lines, vec!["review and note one takeaway"]);
    assert_eq!(parsed.category, "Y-topic");
    assert!(!parsed.has_action_block);
}

#[test]
fn only_start_marker_is_treated_as_missing() {
    let raw = "Summary\n---ACTION_START---\n- do X";
    let parsed = parse_response(raw, &topics());

    assert_eq!(parsed.analysis_text, raw);
    assert_eq!(parsed.raw_action_lines, vec!["review and note one takeaway"]);
}

#[test]
fn empty_response_yields_fallbacks() {
    let parsed = parse_response("", &topics());

    assert_eq!(parsed.analysis_text, "");
    assert_eq!(parsed.raw_action_lines, vec!["review and note one takeaway"]);
    assert_eq!(parsed.category, "other");
}

#[test]
fn empty_action_block_yields_placeholder() {
    let raw = "Summary ---ACTION_START---\n\n  \n---ACTION_END---";
    let parsed = parse_response(raw, &topics());

    assert_eq!(parsed.analysis_text, "Summary");
    assert!(parsed.has_action_block);
    assert_eq!(parsed.raw_action_lines, vec!["review and note one takeaway"]);
}

#[test]
fn category_follows_priority_not_text_order() {
    let raw = "This is about Y-topic and also X-topic.\n---ACTION_START---\n- a\n---ACTION_END---";
    let parsed = parse_response(raw, &topics());
    assert_eq!(parsed.category, "X-topic");

    let reversed = Taxonomy::new(["Y-topic", "X-topic"], "other").unwrap();
    let parsed = parse_response(raw, &reversed);
    assert_eq!(parsed.category, "Y-topic");
}

#[test]
fn category_is_matched_against_analysis_only() {
    let raw = "Plain summary\n---ACTION_START---\n- read about X-topic\n---ACTION_END---";
    let parsed = parse_response(raw, &topics());
    assert_eq!(parsed.category, "other");
}

#[test]
fn leading_marker_response_keeps_non_empty_analysis() {
    let raw = "---ACTION_START---\n- read about X-topic\n---ACTION_END---";
    let parsed = parse_response(raw, &topics());

    assert_eq!(parsed.analysis_text, "- read about X-topic");
    assert_eq!(parsed.raw_action_lines, vec!["read about X-topic"]);
    assert_eq!(parsed.category, "other");

    let prefixed = parse_response(&format!("Plain summary\n{raw}"), &topics());
    assert_eq!(prefixed.analysis_text, "Plain summary");
    assert_eq!(prefixed.category, parsed.category);
}

#[test]
fn leading_marker_response_uses_trailing_text_as_analysis() {
    let raw = "---ACTION_START---\n- do X\n---ACTION_END---\nNotes on Y-topic.\n";
    let parsed = parse_response(raw, &topics());

    assert_eq!(parsed.analysis_text, "Notes on Y-topic.");
    assert_eq!(parsed.category, "Y-topic");
    assert_eq!(parsed.raw_action_lines, vec!["do X"]);
}

#[test]
fn action_lines_are_normalized_and_blank_lines_dropped() {
    let raw = "Summary\n---ACTION_START---\n\n1. first\n- second\n* third\n- [ ] fourth\n   \n---ACTION_END---\ntrailing";
    let parsed = parse_response(raw, &topics());

    assert_eq!(
        parsed.raw_action_lines,
        vec!["first", "second", "third", "fourth"]
    );
    let board = parsed.to_board();
    assert_eq!(board.len(), 4);
    assert!(board.items().iter().all(|item| !item.done));
}

#[test]
fn custom_delimiters_and_placeholder_are_honored() {
    let parser = ResponseParser::new(topics())
        .with_delimiters(Delimiters {
            start: "<<tasks>>".to_string(),
            end: "<</tasks>>".to_string(),
        })
        .with_placeholder("write one sentence");

    let parsed = parser.parse("About X-topic <<tasks>>\n1. go\n<</tasks>>");
    assert_eq!(parsed.analysis_text, "About X-topic");
    assert_eq!(parsed.category, "X-topic");
    assert_eq!(parsed.raw_action_lines, vec!["go"]);

    let parsed = parser.parse("no markers at all");
    assert_eq!(parsed.raw_action_lines, vec!["write one sentence"]);
}
