use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Plain-text captions for one video, as produced by a [`crate::yt::CaptionSource`].
#[derive(Debug, Clone)]
pub struct VideoCaptions {
    pub title: String,
    pub subtitle_text: String,
}

/// Final pipeline output for one video.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub title: String,
    pub transcript: String,
    pub summary: String,
}

/// The slice of yt-dlp's `-J` metadata dump this pipeline consumes.
#[derive(Debug, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<SubtitleTrack>>,
    #[serde(default)]
    pub automatic_captions: HashMap<String, Vec<SubtitleTrack>>,
}

#[derive(Debug, Deserialize)]
pub struct SubtitleTrack {
    pub ext: Option<String>,
    pub url: String,
}
