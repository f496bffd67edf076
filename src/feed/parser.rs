//! Regex-driven RSS item extraction.
//!
//! The parser is deliberately forgiving: it scans for `<item>` blocks
//! rather than building a document tree, so feeds with stray markup or a
//! truncated tail still yield every well-formed item. Blocks without a
//! closing tag are skipped.

use super::domain::FeedItem;
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[expect(
    clippy::expect_used,
    reason = "patterns are literals covered by the parser tests"
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("feed parser pattern must compile")
}

fn field_pattern(tag: &str) -> Regex {
    compile(&format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>"))
}

static ITEM_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<item(?:\s[^>]*)?>(.*?)</item\s*>"));
static ITEM_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)<item(?:\s[^>]*)?>"));
static CDATA: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<!\[CDATA\[(.*?)\]\]>"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);"));

static TITLE: LazyLock<Regex> = LazyLock::new(|| field_pattern("title"));
static LINK: LazyLock<Regex> = LazyLock::new(|| field_pattern("link"));
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| field_pattern("description"));
static PUB_DATE: LazyLock<Regex> = LazyLock::new(|| field_pattern("pubDate"));
static GUID: LazyLock<Regex> = LazyLock::new(|| field_pattern("guid"));

/// Extracts every usable item from an RSS document, in document order.
///
/// Items whose guid, link and title are all empty are dropped. Duplicate
/// guids are kept; deduplication is the caller's concern.
#[must_use]
pub fn parse_feed(document: &str) -> Vec<FeedItem> {
    ITEM_BLOCK
        .captures_iter(document)
        .filter_map(|captures| captures.get(1))
        .filter_map(|body| parse_item(innermost_body(body.as_str())))
        .collect()
}

/// Drops the content of unclosed `<item>` blocks swallowed by a lazy match.
///
/// `<item>a<item>b</item>` matches once with body `a<item>b`; only the text
/// after the last inner opening tag belongs to the closed item.
fn innermost_body(body: &str) -> &str {
    ITEM_OPEN
        .find_iter(body)
        .last()
        .and_then(|opening| body.get(opening.end()..))
        .unwrap_or(body)
}

fn parse_item(body: &str) -> Option<FeedItem> {
    FeedItem::new(
        field(&TITLE, body),
        field(&LINK, body),
        field(&DESCRIPTION, body),
        field(&PUB_DATE, body),
        field(&GUID, body),
    )
}

fn field(pattern: &Regex, body: &str) -> String {
    pattern
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|raw| text_content(raw.as_str()))
        .unwrap_or_default()
}

/// Unwraps CDATA sections verbatim and entity-decodes everything else.
fn text_content(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut cursor = 0;
    for section in CDATA.captures_iter(raw) {
        let (Some(whole), Some(inner)) = (section.get(0), section.get(1)) else {
            continue;
        };
        if let Some(plain) = raw.get(cursor..whole.start()) {
            text.push_str(&decode_entities(plain));
        }
        text.push_str(inner.as_str());
        cursor = whole.end();
    }
    if let Some(rest) = raw.get(cursor..) {
        text.push_str(&decode_entities(rest));
    }
    text.trim().to_owned()
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |captures: &Captures<'_>| {
            let original = captures.get(0).map_or("", |m| m.as_str());
            let name = captures.get(1).map_or("", |m| m.as_str());
            decode_entity(name).map_or_else(|| original.to_owned(), String::from)
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        numeric => {
            let digits = numeric.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
