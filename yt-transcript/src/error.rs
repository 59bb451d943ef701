/// All errors that can occur in yt-transcript.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid video id: {0:?}")]
    InvalidVideoId(String),

    #[error("YouTube rate limit. Please try again later.")]
    RateLimited,

    #[error("No transcript available for this video.")]
    TranscriptUnavailable,

    #[error("YouTube is temporarily blocking this video's transcript. Please try again later or try a different video.")]
    BotBlocked,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
