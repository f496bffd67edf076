//! Best-effort extraction of structured ideas from model output.
//!
//! Models wrap JSON in prose or code fences. Candidates are tried in a
//! fixed order: the first fenced block, the first balanced `{...}` span,
//! then the whole text. The first candidate that parses wins.

use super::ContentIdea;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal covered by the extraction tests"
)]
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").expect("fence pattern must compile")
});

#[derive(Debug, Deserialize)]
struct IdeaEnvelope {
    #[serde(default)]
    ideas: Vec<Value>,
}

/// Returns the extraction candidates for `text`, most specific first.
///
/// Duplicate candidates are removed; the whole trimmed text is always the
/// last entry.
#[must_use]
pub fn extract_json_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(fenced) = FENCED_BLOCK
        .captures(text)
        .and_then(|captures| captures.get(1))
    {
        candidates.push(fenced.as_str().trim());
    }
    if let Some(span) = first_balanced_object(text) {
        candidates.push(span);
    }
    candidates.push(text.trim());
    candidates.dedup();
    candidates
}

/// Parses the ideas array out of a model response.
///
/// Entries that are not idea objects are skipped individually. Returns
/// `None` when no candidate parses or when no idea has a title.
#[must_use]
pub fn parse_ideas(text: &str) -> Option<Vec<ContentIdea>> {
    extract_json_candidates(text)
        .into_iter()
        .find_map(|candidate| serde_json::from_str::<IdeaEnvelope>(candidate).ok())
        .map(|envelope| {
            envelope
                .ideas
                .into_iter()
                .filter_map(|entry| serde_json::from_value::<ContentIdea>(entry).ok())
                .filter(|idea| !idea.title.trim().is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|ideas| !ideas.is_empty())
}

/// Finds the first `{` and its matching `}`, ignoring braces in strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let tail = text.get(start..)?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, character) in tail.char_indices() {
        if in_string {
            match character {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match character {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return tail.get(..=offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{extract_json_candidates, parse_ideas};
    use rstest::rstest;

    const IDEAS: &str = r#"{"ideas":[{"title":"A","description":"d","format":"reels","objective":"o","hook":"h"}]}"#;

    #[rstest]
    fn prefers_fenced_json_block() {
        let response = format!("Here you go:\n```json\n{IDEAS}\n```\nEnjoy {{not json}}");

        let candidates = extract_json_candidates(&response);

        assert_eq!(candidates.first().copied(), Some(IDEAS));
        let ideas = parse_ideas(&response).expect("ideas parsed");
        assert_eq!(ideas.first().map(|idea| idea.format.as_str()), Some("reels"));
    }

    #[rstest]
    fn accepts_bare_fences() {
        let response = format!("```\n{IDEAS}\n```");
        assert_eq!(parse_ideas(&response).map(|ideas| ideas.len()), Some(1));
    }

    #[rstest]
    fn finds_object_inside_prose() {
        let response = format!("Sure! {IDEAS} Let me know if you need more.");
        assert_eq!(parse_ideas(&response).map(|ideas| ideas.len()), Some(1));
    }

    #[rstest]
    fn ignores_braces_inside_strings() {
        let response = r#"prefix {"ideas":[{"title":"Use } and { freely"}]} suffix"#;

        let ideas = parse_ideas(response).expect("ideas parsed");

        assert_eq!(
            ideas.first().map(|idea| idea.title.as_str()),
            Some("Use } and { freely")
        );
    }

    #[rstest]
    fn falls_back_to_whole_text() {
        let candidates = extract_json_candidates("  plain  ");
        assert_eq!(candidates, vec!["plain"]);
    }

    #[rstest]
    fn keeps_real_ideas_when_fields_are_null() {
        let response = r#"{"ideas":[
            {"title":"Real idea","description":"d","format":"reels","objective":"o","hook":null},
            "stray text",
            {"title":"Second","format":null}
        ]}"#;

        let ideas = parse_ideas(response).expect("ideas parsed");

        let titles: Vec<&str> = ideas.iter().map(|idea| idea.title.as_str()).collect();
        assert_eq!(titles, vec!["Real idea", "Second"]);
        assert_eq!(ideas.first().map(|idea| idea.hook.as_str()), Some(""));
    }

    #[rstest]
    #[case::not_json("I could not think of anything today.")]
    #[case::empty_ideas(r#"{"ideas": []}"#)]
    #[case::untitled_ideas(r#"{"ideas": [{"title": "  "}]}"#)]
    #[case::wrong_shape(r#"{"ideas": "none"}"#)]
    fn rejects_unusable_output(#[case] response: &str) {
        assert!(parse_ideas(response).is_none());
    }
}
