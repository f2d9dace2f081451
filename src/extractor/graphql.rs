//! GraphQL client for the primary extraction path
//!
//! One `shareLinks` query per talk slug. The response carries native and
//! per-language subtitled download tiers but no title or speaker, so the
//! caller still scrapes those from the talk page afterwards.
use super::Talk;
use crate::error::{ExtractError, Result};
use serde::Deserialize;
use serde_json::json;

/// Fixed query text sent with every shareLinks request
pub(crate) const SHARE_LINKS_QUERY: &str = r#"query shareLinks($slug: String!, $language: String) {
	videos(
		slug: [$slug]
		language: $language
		first: 1
		isPublished: [true, false]
		channel: ALL
	) {
		nodes {
			id
			canonicalUrl
			audioDownload
			nativeDownloads {
				low
				medium
				high
			}
			subtitledDownloads {
				low
				high
				internalLanguageCode
				languageName
			}
		}
	}
}"#;

/// Build the JSON request body for a shareLinks query
pub(crate) fn request_body(slug: &str) -> serde_json::Value {
    json!({
        "operationName": "shareLinks",
        "variables": {
            "slug": slug,
            "language": "en",
        },
        "query": SHARE_LINKS_QUERY,
    })
}

#[derive(Debug, Deserialize, Default)]
struct ShareLinksResponse {
    #[serde(default)]
    data: ResponseData,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize, Default)]
struct ResponseData {
    #[serde(default)]
    videos: Videos,
}

#[derive(Debug, Deserialize, Default)]
struct Videos {
    #[serde(default)]
    nodes: Vec<VideoNode>,
}

#[derive(Debug, Deserialize, Default)]
struct VideoNode {
    #[serde(default, rename = "subtitledDownloads")]
    subtitled_downloads: Vec<SubtitledDownload>,
}

#[derive(Debug, Deserialize, Default)]
struct SubtitledDownload {
    #[serde(default)]
    low: Option<String>,
    #[serde(default)]
    high: Option<String>,
    #[serde(default, rename = "internalLanguageCode")]
    internal_language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
}

/// Derive a normalized talk from a raw shareLinks response body
///
/// The English entry's `low`/`high` tiers become the "720p"/"1080p" video
/// URLs (a fixed convention, not read from the data). Every entry with a
/// non-empty `low` tier also contributes a subtitle URL under its lowercased
/// language code: the subtitle link reuses the lowest video tier, which is a
/// deliberate simplification of the API shape.
pub(crate) fn talk_from_share_links(url: &str, raw: &[u8]) -> Result<Talk> {
    let response: ShareLinksResponse = serde_json::from_slice(raw)?;

    if let Some(error) = response.errors.first() {
        return Err(ExtractError::Graphql(error.message.clone()));
    }

    let Some(node) = response.data.videos.nodes.first() else {
        return Err(ExtractError::NoData);
    };

    let mut talk = Talk {
        url: url.to_string(),
        ..Default::default()
    };

    for sub in &node.subtitled_downloads {
        if sub.internal_language_code.as_deref() == Some("en") {
            talk.video_urls
                .insert("720p".to_string(), sub.low.clone().unwrap_or_default());
            talk.video_urls
                .insert("1080p".to_string(), sub.high.clone().unwrap_or_default());
            break;
        }
    }

    for sub in &node.subtitled_downloads {
        if let Some(low) = sub.low.as_deref().filter(|l| !l.is_empty()) {
            let lang = sub
                .internal_language_code
                .clone()
                .unwrap_or_default()
                .to_lowercase();
            talk.subtitle_urls.insert(lang, low.to_string());
        }
    }

    Ok(talk)
}
