//! Talk extraction module
//!
//! Resolves a TED talk identifier (title search, topic tag, or canonical
//! `/talks/<slug>` URL) into a normalized [`Talk`] record. The primary source
//! is the GraphQL API; when it fails or returns nothing, extraction falls
//! back to scraping the embedded JSON and markup of the talk page.

pub mod graphql;
pub mod listing;
pub mod page;
pub mod resolver;
pub mod script;
pub mod subtitles;

// Re-export main types
pub use resolver::{parse_talk_document, slug_from_url, TalkExtractor};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A TED talk with its extracted metadata and media links
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Talk {
    /// Talk title, may be empty on partial extraction
    pub title: String,
    /// Speaker name, may be empty on partial extraction
    pub speaker: String,
    /// Canonical talk URL
    pub url: String,
    /// Quality label ("720p", "1080p") -> direct download URL
    pub video_urls: HashMap<String, String>,
    /// Richer video records in source order; only the HTML path fills these,
    /// the GraphQL API does not expose file sizes
    pub video_formats: Vec<VideoFormat>,
    /// Language code -> subtitle download URL
    pub subtitle_urls: HashMap<String, String>,
}

/// A specific downloadable video rendition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoFormat {
    /// Quality label, e.g. "1080p", "720p"
    pub quality: String,
    /// Direct download URL
    pub url: String,
    /// File size in bytes, 0 if unknown
    pub size: i64,
}

impl Talk {
    /// Whether any video or subtitle link was extracted
    pub fn has_media(&self) -> bool {
        !self.video_urls.is_empty() || !self.subtitle_urls.is_empty() || !self.video_formats.is_empty()
    }
}
