pub mod captions;
pub mod config;
pub mod error;
pub mod innertube;
pub mod types;

pub use config::FetchOptions;
pub use error::{Error, Result};
pub use types::{Segment, Transcript};

/// Fetch a video's transcript with default options.
pub async fn fetch_transcript(video_id: &str) -> Result<Transcript> {
    fetch_transcript_with_options(video_id, &FetchOptions::default()).await
}

/// Fetch a video's transcript with custom options.
pub async fn fetch_transcript_with_options(
    video_id: &str,
    options: &FetchOptions,
) -> Result<Transcript> {
    let client = reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .cookie_store(true)
        .timeout(options.timeout)
        .build()?;

    let xml = innertube::fetch_caption_xml(&client, video_id).await?;

    let snippets = captions::parse_caption_xml(&xml);
    let segments = captions::project_segments(snippets);

    Ok(Transcript {
        video_id: video_id.to_string(),
        segments,
    })
}
