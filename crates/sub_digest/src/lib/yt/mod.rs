pub mod ytdlp;

use std::future::Future;

use crate::types::VideoCaptions;

/// Retrieves a video's title and caption track as plain subtitle text.
///
/// Everything behind this seam (metadata lookup, caption format handling,
/// language preference) is opaque to the pipeline.
pub trait CaptionSource {
    fn fetch_captions(
        &self,
        url: &str,
    ) -> impl Future<Output = anyhow::Result<VideoCaptions>> + Send;
}
