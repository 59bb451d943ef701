use serde::{Deserialize, Serialize};

/// One caption segment: trimmed text plus start offset and duration in
/// seconds, both rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub offset: f64,
    pub duration: f64,
}

/// Complete fetched transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Full text (all segments concatenated).
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One line per segment, prefixed with its timestamp: `[m:ss] text`.
    pub fn annotated_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("[{}] {}", format_time(s.offset), s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format as JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Format as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Format seconds as `h:mm:ss`, or `m:ss` under an hour.
pub fn format_time(seconds: f64) -> String {
    let total = seconds as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
