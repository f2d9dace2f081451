//! tedgrab - TED talk fetcher
//!
//! Resolves TED talks by title, topic, or URL into normalized records of
//! available video qualities and subtitle languages, then downloads the
//! selected media. Extraction queries the GraphQL API first and falls back
//! to scraping the embedded JSON and markup of the talk page.

pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::downloader::Downloader;
pub use crate::error::{ExtractError, Result};
pub use crate::extractor::{slug_from_url, Talk, TalkExtractor, VideoFormat};
