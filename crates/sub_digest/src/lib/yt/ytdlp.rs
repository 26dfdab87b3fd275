use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use vtt_text::vtt_to_text;

use crate::types::{SubtitleTrack, VideoCaptions, VideoMetadata};
use crate::yt::CaptionSource;

/// Caption retrieval through the `yt-dlp` binary's JSON dump.
///
/// Manual subtitle tracks are preferred over automatic captions, in the
/// configured language order, vtt format only.
pub struct YtDlpCaptionSource {
    http_client: reqwest::Client,
    ytdlp_bin: PathBuf,
    languages: Vec<String>,
}

impl Default for YtDlpCaptionSource {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlpCaptionSource {
    pub fn new(ytdlp_bin: impl Into<PathBuf>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            ytdlp_bin: ytdlp_bin.into(),
            languages: vec!["ja".into(), "en".into()],
        }
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    async fn dump_metadata(&self, url: &str) -> anyhow::Result<VideoMetadata> {
        let output = Command::new(&self.ytdlp_bin)
            .args(["--dump-single-json", "--skip-download", url])
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            anyhow::bail!(
                "yt-dlp exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(serde_json::from_slice::<VideoMetadata>(&output.stdout)?)
    }

    fn vtt_track<'a>(tracks: Option<&'a [SubtitleTrack]>) -> Option<&'a SubtitleTrack> {
        tracks?.iter().find(|t| t.ext.as_deref() == Some("vtt"))
    }
}

impl CaptionSource for YtDlpCaptionSource {
    #[tracing::instrument(skip(self))]
    async fn fetch_captions(&self, url: &str) -> anyhow::Result<VideoCaptions> {
        let metadata = self
            .dump_metadata(url)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to dump video metadata"))?;
        let title = metadata.title.clone().unwrap_or_default();

        for lang in &self.languages {
            let track = Self::vtt_track(metadata.subtitles.get(lang).map(Vec::as_slice))
                .or_else(|| {
                    Self::vtt_track(metadata.automatic_captions.get(lang).map(Vec::as_slice))
                });
            let Some(track) = track else {
                continue;
            };

            let vtt = self
                .http_client
                .get(&track.url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;

            let subtitle_text = vtt_to_text(&vtt);
            if !subtitle_text.trim().is_empty() {
                tracing::debug!(%lang, "Using caption track");
                return Ok(VideoCaptions {
                    title,
                    subtitle_text,
                });
            }
        }

        anyhow::bail!("No subtitles found")
    }
}
