//! Listing extraction: pull video records out of a results page without
//! parsing its embedded JSON.
//!
//! The page embeds one object per result, each introduced by a renderer
//! key. Three renderer shapes are known:
//!
//! | shape      | marker                              | title key           |
//! |------------|-------------------------------------|---------------------|
//! | `Compact`  | `compactVideoRenderer":{"videoId`   | `simpleText`        |
//! | `Standard` | `videoRenderer":{"videoId`          | `title.runs[].text` |
//! | `Channel`  | `VideoRenderer":{"videoId`          | `title.runs[].text` |
//!
//! Identifier, thumbnail and title are required: the first one that cannot
//! be read ends the scan and everything collected so far is returned.
//! Offsets past that point no longer line up with a record, so the tail is
//! dropped rather than guessed at. Channel name and duration are optional
//! and never end the scan.

use crate::record::{VideoRecord, WATCH_PATH_PREFIX};
use crate::scanner::Scanner;

/// Length of a video identifier, in bytes.
pub const VIDEO_ID_LEN: usize = 11;

const VIDEO_ID_KEY: &str = r#""videoId":""#;
const THUMBNAIL_KEY: &str = r#""url":""#;
const SIMPLE_TEXT_KEY: &str = r#"simpleText":""#;
const RUNS_TITLE_KEY: &str = r#""title":{"runs":[{"text":""#;
const BYLINE_KEY: &str = "longBylineText";
const BYLINE_TEXT_KEY: &str = r#"longBylineText":{"runs":[{"text":""#;
const LENGTH_KEY: &str = "lengthText";

/// Renderer layout a record was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererShape {
    Compact,
    Standard,
    Channel,
}

impl RendererShape {
    /// Search order. A compact renderer anywhere ahead wins over a closer
    /// standard one.
    const PRIORITY: [RendererShape; 3] = [
        RendererShape::Compact,
        RendererShape::Standard,
        RendererShape::Channel,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            RendererShape::Compact => r#"compactVideoRenderer":{"videoId"#,
            RendererShape::Standard => r#"videoRenderer":{"videoId"#,
            RendererShape::Channel => r#"VideoRenderer":{"videoId"#,
        }
    }

    fn title_key(self) -> &'static str {
        match self {
            RendererShape::Compact => SIMPLE_TEXT_KEY,
            RendererShape::Standard | RendererShape::Channel => RUNS_TITLE_KEY,
        }
    }

    fn has_byline(self) -> bool {
        !matches!(self, RendererShape::Channel)
    }
}

/// Required field whose absence ended a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Missing {
    VideoId,
    Thumbnail,
    Title,
}

/// Scan a results page and return every complete record, in page order.
///
/// Never fails: malformed or truncated input just produces fewer records.
/// Titles are returned raw; see [`crate::normalize_title`].
///
/// ```
/// use termtube_extract::scan_listing;
///
/// let page = r#"videoRenderer":{"videoId":"abc12345678","thumbnail":{"thumbnails":[{"url":"http://t/x.jpg"}]},"title":{"runs":[{"text":"Hello"}]}"#;
/// let records = scan_listing(page);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].id_or_path, "/watch?v=abc12345678");
/// assert_eq!(records[0].title, "Hello");
/// ```
pub fn scan_listing(text: &str) -> Vec<VideoRecord> {
    let mut scanner = Scanner::new(text);
    let mut records = Vec::new();

    while let Some((shape, at)) = next_renderer(&scanner) {
        scanner.seek(at);
        match scan_record(&mut scanner, shape) {
            Ok(record) => records.push(record),
            Err(missing) => {
                tracing::debug!(
                    ?shape,
                    ?missing,
                    offset = scanner.cursor(),
                    kept = records.len(),
                    "extract.listing.truncated"
                );
                break;
            }
        }
    }

    records
}

fn next_renderer(scanner: &Scanner<'_>) -> Option<(RendererShape, usize)> {
    RendererShape::PRIORITY
        .iter()
        .find_map(|shape| scanner.find(shape.marker()).map(|at| (*shape, at)))
}

fn scan_record(scanner: &mut Scanner<'_>, shape: RendererShape) -> Result<VideoRecord, Missing> {
    let mut record = VideoRecord::default();

    scanner.skip_past(VIDEO_ID_KEY).ok_or(Missing::VideoId)?;
    let id = scanner.take(VIDEO_ID_LEN).ok_or(Missing::VideoId)?;
    record.id_or_path = format!("{WATCH_PATH_PREFIX}{id}");

    scanner.skip_past(THUMBNAIL_KEY).ok_or(Missing::Thumbnail)?;
    record.thumbnail_url = scanner.until('"').ok_or(Missing::Thumbnail)?.to_string();

    scanner.skip_past(shape.title_key()).ok_or(Missing::Title)?;
    record.title = scanner.until('"').ok_or(Missing::Title)?.to_string();

    if shape.has_byline() {
        if let Some(at) = scanner.find(BYLINE_KEY) {
            // The nested `runs[0].text` key is assumed, not checked.
            scanner.seek(at + BYLINE_TEXT_KEY.len());
            if let Some(channel) = scanner.until('"') {
                record.channel_name = channel.to_string();
            }
        }

        if let Some(at) = scanner.find(LENGTH_KEY) {
            scanner.seek(at);
            if scanner.skip_past(SIMPLE_TEXT_KEY).is_some() {
                if let Some(duration) = scanner.until('"') {
                    record.duration = duration.to_string();
                }
            }
        }
    }

    Ok(record)
}
