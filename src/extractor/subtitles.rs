//! Subtitle link extraction from talk page markup
use super::Talk;
use scraper::{Html, Selector};

/// Collect subtitle download links from anchors carrying a language attribute
///
/// Anchors with an empty language code or no href are skipped silently.
/// Relative hrefs are absolutized against the site base URL.
pub(crate) fn extract_subtitle_links(document: &Html, base_url: &str, talk: &mut Talk) {
    let Ok(selector) = Selector::parse("a[data-language]") else {
        return;
    };

    for anchor in document.select(&selector) {
        let lang = anchor.value().attr("data-language").unwrap_or("");
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if lang.is_empty() {
            continue;
        }

        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", base_url, href)
        };
        talk.subtitle_urls.insert(lang.to_string(), url);
    }
}
