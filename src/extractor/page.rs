//! HTTP page fetching and basic markup queries
use crate::config::Config;
use crate::error::{ExtractError, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

/// Build the shared HTTP client used by both extraction paths
pub(crate) fn build_client(config: &Config) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(&config.user_agent)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Fetch a page and return its body, surfacing non-2xx statuses as errors
///
/// No retries here: retry discipline belongs to the file downloader, not the
/// metadata fetch.
pub(crate) async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ExtractError::Http {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Text of the first element matching `selector`, trimmed; empty when absent
pub(crate) fn first_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
