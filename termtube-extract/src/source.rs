//! Provider selection.
//!
//! Each provider implements [`Extractor`]; [`select_extractor`] picks one by
//! the URL's host. The scanners themselves know nothing about providers.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use termtube_http::DEFAULT_USER_AGENT;
use url::Url;

use crate::record::VideoRecord;
use crate::youtube::YouTubeExtractor;
use crate::ExtractError;

/// Known video providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    YouTube,
}

impl Provider {
    pub const ALL: [Provider; 1] = [Provider::YouTube];

    /// Registrable domains served by this provider.
    pub fn hosts(self) -> &'static [&'static str] {
        match self {
            Provider::YouTube => &["youtube.com"],
        }
    }

    /// True when `host` is one of [`Provider::hosts`] or a subdomain of one.
    pub fn matches_host(self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.hosts().iter().any(|known| {
            host == *known
                || host
                    .strip_suffix(known)
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    pub fn for_url(url: &str) -> Option<Provider> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        Provider::ALL.into_iter().find(|p| p.matches_host(host))
    }
}

/// Knobs shared by every extractor.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Scheme + host that relative watch paths resolve against.
    pub origin: String,
    pub timeout: Duration,
    pub retries: usize,
    pub user_agent: String,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            origin: "https://www.youtube.com".into(),
            timeout: Duration::from_secs(15),
            retries: 2,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

/// A source of listings and stream URLs.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn provider(&self) -> Provider;

    /// Search page URL for a free-text query.
    fn search_url(&self, query: &str) -> String;

    /// Absolute watch URL for a record found by this extractor.
    fn watch_url(&self, record: &VideoRecord) -> String;

    /// Fetch `url` and scan it for video records. Titles come back normalized.
    async fn extract_listing(&self, url: &str) -> Result<Vec<VideoRecord>, ExtractError>;

    /// Fetch `url` and scan it for a direct stream URL; empty when absent.
    async fn extract_playback(&self, url: &str) -> Result<String, ExtractError>;
}

/// Pick the extractor that serves `url`.
pub fn select_extractor(
    url: &str,
    opts: &ExtractorOptions,
) -> Result<Arc<dyn Extractor>, ExtractError> {
    match Provider::for_url(url) {
        Some(Provider::YouTube) => Ok(Arc::new(YouTubeExtractor::new(opts)?)),
        None => {
            tracing::warn!(%url, "extract.unsupported_source");
            Err(ExtractError::UnsupportedSource(url.to_string()))
        }
    }
}
