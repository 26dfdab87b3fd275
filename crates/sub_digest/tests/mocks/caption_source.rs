use sub_digest::{yt::CaptionSource, VideoCaptions};

pub struct MockCaptionSource {
    pub title: String,
    pub subtitle_text: String,
    pub fail_with: Option<String>,
}

impl MockCaptionSource {
    pub fn new(title: &str, subtitle_text: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle_text: subtitle_text.to_string(),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            title: String::new(),
            subtitle_text: String::new(),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl CaptionSource for MockCaptionSource {
    async fn fetch_captions(&self, _url: &str) -> anyhow::Result<VideoCaptions> {
        if let Some(ref msg) = self.fail_with {
            anyhow::bail!("{}", msg);
        }
        Ok(VideoCaptions {
            title: self.title.clone(),
            subtitle_text: self.subtitle_text.clone(),
        })
    }
}
