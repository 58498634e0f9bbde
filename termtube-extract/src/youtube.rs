use async_trait::async_trait;
use termtube_http::HttpClient;
use url::form_urlencoded;

use crate::listing::scan_listing;
use crate::playback::scan_playback;
use crate::record::VideoRecord;
use crate::source::{Extractor, ExtractorOptions, Provider};
use crate::ExtractError;

const SEARCH_PATH: &str = "/results?search_query=";

/// Extractor for YouTube result and watch pages.
#[derive(Clone)]
pub struct YouTubeExtractor {
    http: HttpClient,
    origin: String,
}

impl YouTubeExtractor {
    pub fn new(opts: &ExtractorOptions) -> Result<Self, ExtractError> {
        let http = HttpClient::with_user_agent(&opts.origin, &opts.user_agent)?
            .with_timeout(opts.timeout)
            .with_retries(opts.retries);
        Ok(Self {
            http,
            origin: opts.origin.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        Ok(self.http.get_text(url).await?)
    }
}

#[async_trait]
impl Extractor for YouTubeExtractor {
    fn provider(&self) -> Provider {
        Provider::YouTube
    }

    fn search_url(&self, query: &str) -> String {
        let escaped: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}{SEARCH_PATH}{escaped}", self.origin)
    }

    fn watch_url(&self, record: &VideoRecord) -> String {
        record.watch_url(&self.origin)
    }

    async fn extract_listing(&self, url: &str) -> Result<Vec<VideoRecord>, ExtractError> {
        let page = self.fetch(url).await?;
        let mut records = scan_listing(&page);
        records.iter_mut().for_each(VideoRecord::normalize_title);
        tracing::info!(
            provider = ?Provider::YouTube,
            bytes = page.len(),
            records = records.len(),
            "extract.listing.done"
        );
        Ok(records)
    }

    async fn extract_playback(&self, url: &str) -> Result<String, ExtractError> {
        let page = self.fetch(url).await?;
        let stream = scan_playback(&page);
        tracing::info!(
            provider = ?Provider::YouTube,
            bytes = page.len(),
            found = !stream.is_empty(),
            "extract.playback.done"
        );
        Ok(stream)
    }
}
