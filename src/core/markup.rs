//! HTML to LaTeX translation for rich text output
//!
//! Cells can emit a small amount of HTML (headings, lists, rules). The
//! translator walks the markup as a flat stream of tags and text and maps every
//! tag through [`crate::data::tags`]. It does not build a tree and does not
//! check that tags are balanced, so unbalanced input yields unbalanced braces.
//!
//! Text between tags is copied as is, without escaping LaTeX special
//! characters. Only HTML character references are decoded.

use crate::data::tags::tag_rule;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Comments, declarations, processing instructions, end tags and start tags
    static ref TAG_PATTERN: Regex = Regex::new(
        r#"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|</\s*(?P<end>[A-Za-z][A-Za-z0-9:-]*)[^>]*>|<(?P<start>[A-Za-z][A-Za-z0-9:-]*)(?P<attrs>(?:[^>"']|"[^"]*"|'[^']*')*)>"#
    )
    .unwrap();

    static ref ENTITY_PATTERN: Regex =
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").unwrap();
}

/// One piece of the markup stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// Start tag, lower-cased name
    Start(String),
    /// End tag, lower-cased name
    End(String),
    /// Raw text between tags
    Text(&'a str),
}

/// Tokenize markup into start tags, end tags and text.
///
/// A self-closing tag (`<br/>`) yields a start and an end event. Comments and
/// declarations yield nothing. A `<` that does not open a tag stays in the text.
pub fn markup_events(markup: &str) -> Vec<MarkupEvent<'_>> {
    let mut events = Vec::new();
    let mut last = 0;

    for caps in TAG_PATTERN.captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            events.push(MarkupEvent::Text(&markup[last..whole.start()]));
        }
        last = whole.end();

        if let Some(name) = caps.name("end") {
            events.push(MarkupEvent::End(name.as_str().to_ascii_lowercase()));
        } else if let Some(name) = caps.name("start") {
            let name = name.as_str().to_ascii_lowercase();
            let self_closing = caps
                .name("attrs")
                .is_some_and(|attrs| attrs.as_str().trim_end().ends_with('/'));
            events.push(MarkupEvent::Start(name.clone()));
            if self_closing {
                events.push(MarkupEvent::End(name));
            }
        }
    }

    if last < markup.len() {
        events.push(MarkupEvent::Text(&markup[last..]));
    }
    events
}

/// Translate HTML into a LaTeX fragment.
///
/// Never fails: unknown tags become brace groups and malformed markup is
/// passed through as text.
pub fn html_to_latex(markup: &str) -> String {
    let mut result = String::with_capacity(markup.len());
    for event in markup_events(markup) {
        match event {
            MarkupEvent::Start(name) => result.push_str(tag_rule(&name).open),
            MarkupEvent::End(name) => result.push_str(tag_rule(&name).close),
            MarkupEvent::Text(text) => result.push_str(&decode_entities(text)),
        }
    }
    result
}

/// Decode HTML character references. Unknown named entities are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_PATTERN
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => numeric_reference(body),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_reference(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}
