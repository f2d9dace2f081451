//! Embedded `talkPage.init` script extraction
//!
//! Older talk pages embed their player data as a JSON object passed to a
//! `talkPage.init({...})` call inside a `<script>` block. This module locates
//! that script, isolates the JSON payload, and decodes the h264 resource list.
use super::{Talk, VideoFormat};
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::debug;

const INIT_MARKER: &str = "talkPage.init";

#[derive(Debug, Deserialize, Default)]
struct PlayerPayload {
    #[serde(default, rename = "playerData")]
    player_data: PlayerData,
}

#[derive(Debug, Deserialize, Default)]
struct PlayerData {
    #[serde(default)]
    talks: Vec<PlayerTalkSet>,
}

#[derive(Debug, Deserialize, Default)]
struct PlayerTalkSet {
    #[serde(default, rename = "player_talks")]
    player_talks: Vec<PlayerTalk>,
}

#[derive(Debug, Deserialize, Default)]
struct PlayerTalk {
    #[serde(default)]
    resources: Resources,
}

#[derive(Debug, Deserialize, Default)]
struct Resources {
    #[serde(default)]
    h264: Vec<H264Entry>,
}

#[derive(Debug, Deserialize)]
struct H264Entry {
    #[serde(default)]
    quality: String,
    #[serde(default)]
    size: i64,
    #[serde(default)]
    file: String,
}

/// Extract video download URLs from the page's embedded player JSON
///
/// Scans script blocks for the init marker and takes the substring from the
/// first `{` to the last `}` of the first matching block as the JSON payload,
/// assuming the init call's single object argument spans that whole range.
/// A decode failure means this source yielded no video data; it is never
/// fatal to the page parse.
pub(crate) fn extract_video_resources(document: &Html, talk: &mut Talk) {
    let Ok(selector) = Selector::parse("script") else {
        return;
    };

    for script in document.select(&selector) {
        let text: String = script.text().collect();
        if !text.contains(INIT_MARKER) {
            continue;
        }

        let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
            return;
        };
        if end < start {
            return;
        }

        let payload: PlayerPayload = match serde_json::from_str(&text[start..=end]) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Failed to decode talkPage.init payload: {}", e);
                return;
            }
        };

        let Some(player_talk) = payload
            .player_data
            .talks
            .first()
            .and_then(|t| t.player_talks.first())
        else {
            return;
        };

        for entry in &player_talk.resources.h264 {
            talk.video_formats.push(VideoFormat {
                quality: entry.quality.clone(),
                url: entry.file.clone(),
                size: entry.size,
            });
            talk.video_urls.insert(entry.quality.clone(), entry.file.clone());
        }
        return;
    }
}
