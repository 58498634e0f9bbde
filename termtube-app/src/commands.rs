use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use termtube_config::TermtubeConfig;
use termtube_extract::{
    Extractor, ExtractorOptions, VideoRecord, extract_playback, record::WATCH_PATH_PREFIX,
    select_extractor,
};
use termtube_tui::{TuiOptions, player};

pub fn extractor_options(cfg: &TermtubeConfig) -> ExtractorOptions {
    let mut opts = ExtractorOptions {
        origin: cfg.provider.origin.trim_end_matches('/').to_string(),
        timeout: Duration::from_secs(cfg.http.timeout_secs),
        retries: cfg.http.retries,
        ..ExtractorOptions::default()
    };
    if let Some(ua) = &cfg.http.user_agent {
        opts.user_agent = ua.clone();
    }
    opts
}

fn provider_extractor(opts: &ExtractorOptions) -> Result<Arc<dyn Extractor>> {
    select_extractor(&opts.origin, opts)
        .with_context(|| format!("configured origin {} is not a supported provider", opts.origin))
}

pub async fn tui(cfg: &TermtubeConfig, opts: &ExtractorOptions) -> Result<()> {
    let extractor = provider_extractor(opts)?;
    termtube_tui::run(
        extractor,
        TuiOptions {
            page_size: cfg.ui.page_size,
            player: cfg.player.clone(),
        },
    )
    .await
}

pub async fn search(
    opts: &ExtractorOptions,
    query: &[String],
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let extractor = provider_extractor(opts)?;
    let query = query.join(" ");
    let url = extractor.search_url(&query);
    let records = extractor
        .extract_listing(&url)
        .await
        .with_context(|| format!("search for {query:?} failed"))?;
    let shown = limit.unwrap_or(records.len()).min(records.len());

    let mut out = io::stdout().lock();
    if records.is_empty() {
        writeln!(out, "No results found.")?;
    }
    for (i, rec) in records.iter().take(shown).enumerate() {
        if json {
            writeln!(out, "{}", serde_json::to_string(rec)?)?;
        } else {
            writeln!(out, "{}", render_record(i + 1, rec, &extractor.watch_url(rec)))?;
        }
    }
    Ok(())
}

pub async fn playback(opts: &ExtractorOptions, url: &str) -> Result<()> {
    let stream = extract_playback(url, opts)
        .await
        .with_context(|| format!("could not read {url}"))?;
    if stream.is_empty() {
        bail!("no playback URL found on {url}");
    }
    println!("{stream}");
    Ok(())
}

pub fn play(cfg: &TermtubeConfig, opts: &ExtractorOptions, target: &str) -> Result<()> {
    let url = watch_url_for(&opts.origin, target);
    let pid = player::launch(&cfg.player, &url)
        .with_context(|| format!("could not start {}", cfg.player.command))?;
    println!("{} started (pid {pid}) on {url}", cfg.player.command);
    Ok(())
}

/// Accepts a full URL, a watch path or a bare video id.
fn watch_url_for(origin: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    let id_or_path = if target.starts_with('/') {
        target.to_string()
    } else {
        format!("{WATCH_PATH_PREFIX}{target}")
    };
    VideoRecord {
        id_or_path,
        ..Default::default()
    }
    .watch_url(origin)
}

fn render_record(n: usize, rec: &VideoRecord, url: &str) -> String {
    let mut line = format!("{n:>3}. {}", rec.title);
    if !rec.duration.is_empty() {
        line.push_str(&format!(" [{}]", rec.duration));
    }
    if !rec.channel_name.is_empty() {
        line.push_str(&format!(" by {}", rec.channel_name));
    }
    line.push_str(&format!("\n     {url}"));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use termtube_config::TermtubeConfigLoader;

    const ORIGIN: &str = "https://www.youtube.com";

    #[test]
    fn play_targets_resolve_to_watch_urls() {
        assert_eq!(
            watch_url_for(ORIGIN, "dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            watch_url_for(ORIGIN, "/watch?v=dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            watch_url_for(ORIGIN, "https://m.youtube.com/watch?v=x"),
            "https://m.youtube.com/watch?v=x"
        );
    }

    #[test]
    fn options_follow_config() {
        let cfg = TermtubeConfigLoader::new()
            .with_yaml_str(
                "provider:\n  origin: https://m.youtube.com/\nhttp:\n  timeout_secs: 4\n  retries: 0\n  user_agent: test-agent\n",
            )
            .load()
            .unwrap();
        let opts = extractor_options(&cfg);
        assert_eq!(opts.origin, "https://m.youtube.com");
        assert_eq!(opts.timeout, Duration::from_secs(4));
        assert_eq!(opts.retries, 0);
        assert_eq!(opts.user_agent, "test-agent");
    }

    #[test]
    fn unsupported_origin_is_reported() {
        let opts = ExtractorOptions {
            origin: "https://vimeo.com".into(),
            ..Default::default()
        };
        let err = provider_extractor(&opts).err().unwrap();
        assert!(err.to_string().contains("vimeo.com"));
    }

    #[test]
    fn text_rows_skip_empty_optional_fields() {
        let rec = VideoRecord {
            id_or_path: "/watch?v=abc12345678".into(),
            title: "Channel upload".into(),
            ..Default::default()
        };
        assert_eq!(
            render_record(1, &rec, "https://www.youtube.com/watch?v=abc12345678"),
            "  1. Channel upload\n     https://www.youtube.com/watch?v=abc12345678"
        );
    }
}
