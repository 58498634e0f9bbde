//! Display cleanup for raw titles lifted out of the page payload.
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Literal substitutions, applied in order. No pattern occurs inside another
/// pattern's replacement, so a single pass is enough.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&amp;", "&"),
    ("\u{2013}", "-"),   // en dash
    ("\u{2026}", "..."), // ellipsis
    ("\u{2019}", "'"),   // right single quote
];

fn unicode_escape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("static regex"))
}

/// Turn a raw title into display text.
///
/// Entity and glyph substitutions run first, then every `\uHHHH` escape is
/// decoded once. Escapes that are not hex, or that name a lone surrogate,
/// stay verbatim.
///
/// ```
/// use termtube_extract::normalize_title;
///
/// assert_eq!(normalize_title(r"Rock &amp; Roll \u0041"), "Rock & Roll A");
/// assert_eq!(normalize_title(r"keep \uZZZZ"), r"keep \uZZZZ");
/// ```
pub fn normalize_title(raw: &str) -> String {
    let mut title = raw.to_string();
    for (pattern, replacement) in REPLACEMENTS {
        if title.contains(pattern) {
            title = title.replace(pattern, replacement);
        }
    }

    unicode_escape()
        .replace_all(&title, |caps: &Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
