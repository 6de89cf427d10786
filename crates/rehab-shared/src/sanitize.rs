//! Plain-text sanitization for every free-text field that crosses the import
//! boundary.
//!
//! No markup survives: tags are removed together with their attributes, the
//! content of script-like elements is dropped, and leftover script URL
//! schemes and event-handler fragments are cut out of the remaining text.
//! One pass can expose new markup (`<scr<script>ipt>`), so passes repeat
//! until the text stops changing. Every pass only deletes, which bounds the
//! loop by the input length and makes the result a fixpoint.

use std::sync::OnceLock;

use regex::Regex;

/// Elements whose text content is dropped along with the tags.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "noscript", "template", "object", "embed", "svg", "math",
    "noembed", "noframes", "xmp",
];

struct Patterns {
    comment: Regex,
    raw_text: Vec<Regex>,
    tag: Regex,
    dangerous: Vec<Regex>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        comment: Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("comment pattern"),
        raw_text: RAW_TEXT_ELEMENTS
            .iter()
            .map(|name| {
                Regex::new(&format!(
                    r"(?is)<\s*{name}\b[^>]*>.*?(?:<\s*/\s*{name}\s*>|\z)"
                ))
                .expect("raw text pattern")
            })
            .collect(),
        // Quoted attribute values may contain `>`; unterminated tags run to
        // the end of the input, as an HTML parser would treat them.
        tag: Regex::new(
            r#"<[!/?]?[A-Za-z](?:[^>"']|"[^"]*(?:"|\z)|'[^']*(?:'|\z))*(?:>|\z)"#,
        )
        .expect("tag pattern"),
        dangerous: [
            r"(?i)<\s*/?\s*script",
            r"(?i)(?:java|vb)\s*script\s*:",
            r"(?i)onerror\s*=",
            r"(?i)\bon(?:load|click|dblclick|mouse[a-z]*|key[a-z]*|focus[a-z]*|blur|pointer[a-z]*|animation[a-z]*|toggle|submit|change|input)\s*=",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("dangerous token pattern"))
        .collect(),
    })
}

fn sanitize_pass(input: &str) -> String {
    let p = patterns();
    let mut text = p.comment.replace_all(input, "").into_owned();
    for element in &p.raw_text {
        text = element.replace_all(&text, "").into_owned();
    }
    text = p.tag.replace_all(&text, "").into_owned();
    for token in &p.dangerous {
        text = token.replace_all(&text, "").into_owned();
    }
    text
}

/// Strip all markup and return plain text.
///
/// Idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(value: &str) -> String {
    let mut current = value.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Sanitize, then cut to at most `limit` characters.
pub fn sanitize_and_truncate(value: &str, limit: usize) -> String {
    let clean = sanitize(value);
    match clean.char_indices().nth(limit) {
        Some((idx, _)) => clean[..idx].to_string(),
        None => clean,
    }
}
