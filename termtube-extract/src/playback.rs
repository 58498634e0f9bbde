//! Playback extraction: find the direct stream URL embedded in a watch page.

use crate::scanner::Scanner;

/// Substring only stream-host URLs carry (with the page's escaped slash).
const STREAM_HOST_MARKER: &str = r"googlevideos.com\/videosplayback";
/// How far before the host marker the URL can start.
const SCHEME_LOOKBEHIND: usize = 30;
const SCHEME: &str = "https:";

/// Escape sequences left in the embedded URL and what they stand for.
const URL_ESCAPES: &[(&str, &str)] = &[(r"\/", "/"), (r"\\u0026", "&")];

/// Return the first stream URL in `text`, unescaped, or an empty string
/// when the page carries none.
///
/// ```
/// use termtube_extract::scan_playback;
///
/// let page = r#"{"url":"https:\/\/r1.googlevideos.com\/videosplayback?a=1\\u0026b=2"}"#;
/// assert_eq!(
///     scan_playback(page),
///     "https://r1.googlevideos.com/videosplayback?a=1&b=2"
/// );
/// assert_eq!(scan_playback("<html></html>"), "");
/// ```
pub fn scan_playback(text: &str) -> String {
    let mut scanner = Scanner::new(text);
    let Some(marker_at) = scanner.find(STREAM_HOST_MARKER) else {
        tracing::debug!(len = text.len(), "extract.playback.missing");
        return String::new();
    };

    scanner.seek(floor_char_boundary(
        text,
        marker_at.saturating_sub(SCHEME_LOOKBEHIND),
    ));
    let Some(start) = scanner.find(SCHEME) else {
        tracing::debug!(marker_at, "extract.playback.no_scheme");
        return String::new();
    };
    scanner.seek(start);
    let Some(raw) = scanner.until('"') else {
        tracing::debug!(start, "extract.playback.unterminated");
        return String::new();
    };

    unescape_url(raw)
}

/// Replace each escape until none is left.
pub fn unescape_url(raw: &str) -> String {
    let mut url = raw.to_string();
    for (escaped, plain) in URL_ESCAPES {
        while url.contains(escaped) {
            url = url.replace(escaped, plain);
        }
    }
    url
}

fn floor_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
