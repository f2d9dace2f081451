//! Talk listing parsing for topic and search result pages
//!
//! Topic pages and search result pages carry the same information in two
//! different markup shapes; both are handled here with one combined selector.
use super::Talk;
use scraper::{ElementRef, Html, Selector};

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element
        .value()
        .attr("class")
        .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse up to `limit` talk stubs (title, speaker, URL) in document order
///
/// Relative hrefs are absolutized against `base_url`. Media links and
/// subtitles are not filled in here; the resolver enriches each stub from its
/// detail page afterwards.
pub(crate) fn parse_listing(document: &Html, base_url: &str, limit: usize) -> Vec<Talk> {
    let Ok(block_selector) = Selector::parse(".media__message, .search__result") else {
        return Vec::new();
    };
    let Ok(search_title) = Selector::parse("h3 a") else {
        return Vec::new();
    };
    let Ok(topic_title) = Selector::parse(".media__message__title a") else {
        return Vec::new();
    };
    let Ok(speaker_selector) = Selector::parse(".media__message__speaker h4, .search__result__speaker")
    else {
        return Vec::new();
    };

    let mut talks = Vec::new();
    for block in document.select(&block_selector).take(limit) {
        let title_link = if has_class(block, "search__result") {
            block.select(&search_title).next()
        } else {
            block.select(&topic_title).next()
        };

        let title = title_link.map(trimmed_text).unwrap_or_default();
        let speaker = block
            .select(&speaker_selector)
            .next()
            .map(trimmed_text)
            .unwrap_or_default();
        let href = title_link
            .and_then(|link| link.value().attr("href"))
            .unwrap_or_default();
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", base_url, href)
        };

        talks.push(Talk {
            title,
            speaker,
            url,
            ..Default::default()
        });
    }

    talks
}
