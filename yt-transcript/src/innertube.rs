//! Transcript retrieval over YouTube's innertube API.
//!
//! Flow: establish session cookies on the homepage, scrape the watch page
//! for the innertube API key and visitor data, ask the player endpoint for
//! caption tracks, then fetch the first track's timedtext XML.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

static RE_API_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY":"([^"]+)""#).expect("valid regex"));
static RE_VISITOR_DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""VISITOR_DATA":"([^"]+)""#).expect("valid regex"));
static RE_FMT_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"&fmt=[^&]+").expect("valid regex"));

// The ANDROID client gets caption tracks without signature deciphering.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    captions: Option<Captions>,
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    reason: Option<String>,
}

fn extract_api_key(watch_body: &str) -> Option<&str> {
    RE_API_KEY
        .captures(watch_body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn extract_visitor_data(watch_body: &str) -> Option<&str> {
    RE_VISITOR_DATA
        .captures(watch_body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Drop the `&fmt=` parameter so YouTube serves the simpler legacy format
/// where available.
fn strip_fmt_param(base_url: &str) -> String {
    RE_FMT_PARAM.replace(base_url, "").into_owned()
}

fn is_bot_reason(status: Option<&PlayabilityStatus>) -> bool {
    status
        .and_then(|s| s.reason.as_deref())
        .is_some_and(|r| r.to_lowercase().contains("bot"))
}

/// Fetch the raw caption XML for a video.
///
/// The client must carry a cookie store: the homepage request seeds the
/// session cookies that authenticate the watch-page and player calls.
pub async fn fetch_caption_xml(client: &reqwest::Client, video_id: &str) -> Result<String> {
    if video_id.trim().is_empty() {
        return Err(Error::InvalidVideoId(video_id.to_string()));
    }

    info!(%video_id, "fetching watch page");

    client.get("https://www.youtube.com/").send().await?;

    let watch_body = client
        .get(format!("https://www.youtube.com/watch?v={video_id}"))
        .send()
        .await?
        .text()
        .await?;

    if watch_body.contains(r#"class="g-recaptcha""#) {
        return Err(Error::RateLimited);
    }

    let api_key = extract_api_key(&watch_body).ok_or(Error::TranscriptUnavailable)?;
    let visitor_data = extract_visitor_data(&watch_body);

    debug!(has_visitor_data = visitor_data.is_some(), "calling player API");

    let mut context_client = serde_json::json!({
        "clientName": CLIENT_NAME,
        "clientVersion": CLIENT_VERSION,
    });
    if let Some(vd) = visitor_data {
        context_client["visitorData"] = serde_json::Value::String(vd.to_string());
    }

    let mut request = client
        .post(format!(
            "https://www.youtube.com/youtubei/v1/player?key={api_key}"
        ))
        .json(&serde_json::json!({
            "context": { "client": context_client },
            "videoId": video_id,
        }));
    if let Some(vd) = visitor_data {
        request = request.header("X-Goog-Visitor-Id", vd);
    }

    let player: PlayerResponse = request.send().await?.json().await?;

    let tracks = player
        .captions
        .as_ref()
        .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
        .and_then(|r| r.caption_tracks.as_ref())
        .filter(|t| !t.is_empty());

    let Some(tracks) = tracks else {
        return Err(if is_bot_reason(player.playability_status.as_ref()) {
            Error::BotBlocked
        } else {
            Error::TranscriptUnavailable
        });
    };

    let transcript_url = strip_fmt_param(&tracks[0].base_url);
    debug!(tracks = tracks.len(), "fetching caption track");

    let xml = client.get(&transcript_url).send().await?.text().await?;
    Ok(xml)
}
