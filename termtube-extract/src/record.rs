use serde::{Deserialize, Serialize};

use crate::title::normalize_title;

/// Relative path every video identifier is appended to.
pub const WATCH_PATH_PREFIX: &str = "/watch?v=";

/// One video discovered in a listing page.
///
/// `duration` and `channel_name` are empty when the page did not carry
/// them (channel results never do).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id_or_path: String,
    pub title: String,
    pub duration: String,
    pub thumbnail_url: String,
    pub channel_name: String,
}

impl VideoRecord {
    /// Absolute watch URL on the given provider origin.
    ///
    /// ```
    /// use termtube_extract::VideoRecord;
    ///
    /// let rec = VideoRecord {
    ///     id_or_path: "/watch?v=abc12345678".into(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     rec.watch_url("https://www.youtube.com/"),
    ///     "https://www.youtube.com/watch?v=abc12345678"
    /// );
    /// ```
    pub fn watch_url(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.id_or_path)
    }

    /// Replace the raw title with its display form.
    pub fn normalize_title(&mut self) {
        self.title = normalize_title(&self.title);
    }
}
