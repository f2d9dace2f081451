//! Resolution orchestrator
//!
//! Decides between listing search and direct-URL resolution, drives the
//! GraphQL path first, and falls back to scraping the talk page when the API
//! fails or returns nothing.
use super::{graphql, listing, page, script, subtitles, Talk};
use crate::config::Config;
use crate::error::{ExtractError, Result};
use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Extract the slug (last non-empty path segment) from a talk URL
///
/// A URL is rejected before any network call when the slug is empty, the
/// slug contains a `.` (a bare domain rather than a talk path), or the URL
/// lacks a `/talks/` segment.
pub fn slug_from_url(url: &str) -> Result<String> {
    let stripped = url.split('?').next().unwrap_or(url);
    let slug = stripped
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or("");

    if slug.is_empty() || slug.contains('.') || !stripped.contains("/talks/") {
        return Err(ExtractError::InvalidUrl(url.to_string()));
    }
    Ok(slug.to_string())
}

/// Build a talk record from raw talk page markup
///
/// Title and speaker come from the first `h1`/`h2`; video links from the
/// embedded player JSON; subtitle links from language-tagged anchors. Fails
/// with [`ExtractError::NoData`] when neither videos nor subtitles were
/// found, never with an empty-but-valid record.
pub fn parse_talk_document(html: &str, url: &str, base_url: &str) -> Result<Talk> {
    let document = Html::parse_document(html);
    let mut talk = Talk {
        url: url.to_string(),
        ..Default::default()
    };

    talk.title = page::first_text(&document, "h1");
    talk.speaker = page::first_text(&document, "h2");
    script::extract_video_resources(&document, &mut talk);
    subtitles::extract_subtitle_links(&document, base_url, &mut talk);

    if talk.video_urls.is_empty() && talk.subtitle_urls.is_empty() {
        return Err(ExtractError::NoData);
    }
    Ok(talk)
}

/// Resolves talk identifiers into normalized [`Talk`] records
///
/// All requests are issued strictly in sequence; one extractor holds no
/// state between resolutions beyond the debug capture map.
pub struct TalkExtractor {
    client: Client,
    config: Config,
    raw_responses: HashMap<String, Vec<u8>>,
}

impl TalkExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an extractor with explicit configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            client: page::build_client(&config),
            config,
            raw_responses: HashMap::new(),
        }
    }

    /// Raw response bytes captured under `key` while debug mode was on
    pub fn raw_response(&self, key: &str) -> Option<&[u8]> {
        self.raw_responses.get(key).map(|bytes| bytes.as_slice())
    }

    fn store_raw_response(&mut self, key: String, data: &[u8]) {
        if self.config.debug {
            self.raw_responses.insert(key, data.to_vec());
        }
    }

    /// Resolve a talk directly from its canonical URL
    ///
    /// Tries the GraphQL API first; any failure there (transport, error
    /// payload, zero nodes) falls back to scraping the talk page.
    pub async fn resolve_url(&mut self, url: &str) -> Result<Talk> {
        let slug = slug_from_url(url)?;
        debug!("Processing slug: {}", slug);

        match self.resolve_graphql(&slug, url).await {
            Ok(talk) => Ok(talk),
            Err(e) => {
                debug!("GraphQL parsing failed: {}, falling back to HTML", e);
                self.resolve_markup(url).await
            }
        }
    }

    /// Resolve a talk by free-text title: search, then resolve the first hit
    pub async fn resolve_title(&mut self, title: &str) -> Result<Talk> {
        let talks = self.resolve_query(title, 1).await?;
        let first = talks
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::NoResults(title.to_string()))?;
        self.resolve_url(&first.url).await
    }

    /// Resolve up to `limit` talks for a topic tag or free-text search
    ///
    /// A query without whitespace is treated as a topic tag, anything else as
    /// a title search. Each listed talk is enriched from its detail page;
    /// per-talk enrichment failures are logged and do not abort the batch.
    pub async fn resolve_query(&mut self, query: &str, limit: usize) -> Result<Vec<Talk>> {
        let listing_url = if !query.contains(char::is_whitespace) {
            format!(
                "{}/talks?topics[]={}",
                self.config.base_url,
                urlencoding::encode(query)
            )
        } else {
            format!("{}/search?q={}", self.config.base_url, query.replace(' ', "+"))
        };
        info!("🔍 Fetching talks list: {}", listing_url);

        let html = page::fetch_page(&self.client, &listing_url).await?;
        let stubs = {
            let document = Html::parse_document(&html);
            listing::parse_listing(&document, &self.config.base_url, limit)
        };
        debug!("Parsed {} talk entries from listing", stubs.len());

        let mut talks = Vec::with_capacity(stubs.len());
        for mut talk in stubs {
            if let Err(e) = self.enrich_from_detail_page(&mut talk).await {
                warn!("Failed to parse talk details for {}: {}", talk.url, e);
            }
            talks.push(talk);
        }
        Ok(talks)
    }

    /// Fill video and subtitle links of a listing stub from its detail page
    async fn enrich_from_detail_page(&self, talk: &mut Talk) -> Result<()> {
        let html = page::fetch_page(&self.client, &talk.url).await?;
        let document = Html::parse_document(&html);
        script::extract_video_resources(&document, talk);
        subtitles::extract_subtitle_links(&document, &self.config.base_url, talk);
        Ok(())
    }

    /// Primary path: shareLinks query plus one page fetch for title/speaker
    async fn resolve_graphql(&mut self, slug: &str, url: &str) -> Result<Talk> {
        let response = self
            .client
            .post(&self.config.graphql_url)
            .header("Accept", "*/*")
            .header("Origin", self.config.base_url.clone())
            .header("Referer", url)
            .header("X-Operation-Name", "shareLinks")
            .json(&graphql::request_body(slug))
            .send()
            .await?;
        let raw = response.bytes().await?;
        self.store_raw_response(format!("graphql_{}", slug), &raw);

        let mut talk = graphql::talk_from_share_links(url, &raw)?;

        // The API carries no title or speaker; scrape them from the page.
        let html = page::fetch_page(&self.client, url).await?;
        self.store_raw_response(format!("html_{}", slug), html.as_bytes());
        {
            let document = Html::parse_document(&html);
            talk.title = page::first_text(&document, "h1");
            talk.speaker = page::first_text(&document, "h2");
        }

        info!("✅ Resolved talk via GraphQL: {} by {}", talk.title, talk.speaker);
        debug!("Available subtitles: {:?}", talk.subtitle_urls.keys());
        Ok(talk)
    }

    /// Fallback path: scrape everything from the talk page markup
    async fn resolve_markup(&mut self, url: &str) -> Result<Talk> {
        let html = page::fetch_page(&self.client, url).await?;
        self.store_raw_response("html_fallback".to_string(), html.as_bytes());

        let talk = parse_talk_document(&html, url, &self.config.base_url)?;
        info!("✅ Resolved talk via HTML fallback: {}", talk.title);
        Ok(talk)
    }
}

impl Default for TalkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_valid_url() {
        let slug = slug_from_url("https://www.ted.com/talks/ariel_ekblaw_how_to_build_in_space").unwrap();
        assert_eq!(slug, "ariel_ekblaw_how_to_build_in_space");
    }

    #[test]
    fn test_slug_ignores_query_string() {
        let slug = slug_from_url("https://www.ted.com/talks/some_talk?language=en&x=1").unwrap();
        assert_eq!(slug, "some_talk");
    }

    #[test]
    fn test_slug_skips_trailing_slash() {
        let slug = slug_from_url("https://www.ted.com/talks/some_talk/").unwrap();
        assert_eq!(slug, "some_talk");
    }

    #[test]
    fn test_bare_domain_is_invalid() {
        assert!(matches!(
            slug_from_url("https://www.ted.com"),
            Err(ExtractError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_without_talks_segment_is_invalid() {
        assert!(matches!(
            slug_from_url("https://www.ted.com/speakers/brene_brown"),
            Err(ExtractError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_slug_is_invalid() {
        assert!(matches!(slug_from_url("?q=1"), Err(ExtractError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_talk_document_with_no_media_is_no_data() {
        let html = "<html><body><h1>Title</h1><h2>Speaker</h2></body></html>";
        let err = parse_talk_document(html, "https://www.ted.com/talks/x", "https://www.ted.com")
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoData));
    }

    #[test]
    fn test_parse_talk_document_extracts_all_fields() {
        let html = r#"<html><head><script>talkPage.init({"playerData":{"talks":[{"player_talks":[{"resources":{"h264":[
            {"quality":"720p","size":100,"file":"https://dl/v.mp4"}
        ]}}]}]}})</script></head>
        <body><h1>Talk title</h1><h2>The speaker</h2>
        <a data-language="en" href="/talks/subtitles/en">en</a>
        </body></html>"#;
        let talk = parse_talk_document(html, "https://www.ted.com/talks/x", "https://www.ted.com")
            .unwrap();
        assert_eq!(talk.title, "Talk title");
        assert_eq!(talk.speaker, "The speaker");
        assert_eq!(talk.video_urls["720p"], "https://dl/v.mp4");
        assert_eq!(
            talk.subtitle_urls["en"],
            "https://www.ted.com/talks/subtitles/en"
        );
    }
}
