//! Text-scanning extraction engine for video listing and watch pages.
//!
//! - [`scan_listing`]: video records out of a results page, by marker search
//! - [`scan_playback`]: the direct stream URL out of a watch page
//! - [`normalize_title`]: entity and `\uHHHH` cleanup for display
//! - [`select_extractor`]: provider lookup by URL host, returning an
//!   [`Extractor`] that fetches and scans in one call
//!
//! Scanning never fails. Only an unsupported URL or a failed fetch is an
//! error; a malformed page yields fewer records, and a watch page without a
//! stream yields an empty string. Callers cannot tell "no results" apart
//! from "first result was malformed".
//!
//! # Examples
//! ```no_run
//! use termtube_extract::{ExtractorOptions, extract_listing};
//!
//! # async fn demo() -> Result<(), termtube_extract::ExtractError> {
//! let opts = ExtractorOptions::default();
//! let records = extract_listing("https://www.youtube.com/results?search_query=rust", &opts).await?;
//! for r in &records {
//!     println!("{} [{}] {}", r.title, r.duration, r.id_or_path);
//! }
//! # Ok(()) }
//! ```
pub mod listing;
pub mod playback;
pub mod record;
mod scanner;
pub mod source;
pub mod title;
pub mod youtube;

use termtube_http::HttpError;
use thiserror::Error;

pub use listing::{RendererShape, scan_listing};
pub use playback::scan_playback;
pub use record::VideoRecord;
pub use source::{Extractor, ExtractorOptions, Provider, select_extractor};
pub use title::normalize_title;
pub use youtube::YouTubeExtractor;

/// Failures that cross the engine boundary.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no extractor available for URL: {0}")]
    UnsupportedSource(String),
    #[error("fetch failed: {0}")]
    Fetch(#[from] HttpError),
}

/// Select the provider for `url`, fetch it and scan it for records.
pub async fn extract_listing(
    url: &str,
    opts: &ExtractorOptions,
) -> Result<Vec<VideoRecord>, ExtractError> {
    select_extractor(url, opts)?.extract_listing(url).await
}

/// Select the provider for `url`, fetch it and scan it for a stream URL.
pub async fn extract_playback(url: &str, opts: &ExtractorOptions) -> Result<String, ExtractError> {
    select_extractor(url, opts)?.extract_playback(url).await
}
