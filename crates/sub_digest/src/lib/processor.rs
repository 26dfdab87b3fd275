pub mod builder;

use crate::error::Error;
use crate::llm::summarizer::Summarizer;
use crate::pipeline::DigestPipeline;
use crate::types::Digest;
use crate::yt::CaptionSource;

/// The end-to-end video digest processor: caption retrieval through the
/// [`CaptionSource`] seam, then the chunk/batch/rollup pipeline.
pub struct VideoDigester<C, S>
where
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub(crate) caption_source: C,
    pub(crate) pipeline: DigestPipeline<S>,
}

impl<C, S> VideoDigester<C, S>
where
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self))]
    pub async fn digest(&self, url: &str) -> Result<Digest, Error> {
        let captions = self
            .caption_source
            .fetch_captions(url)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch captions"))
            .map_err(Error::Captions)?;

        let summary = self
            .pipeline
            .run(&captions.title, &captions.subtitle_text)
            .await?;

        Ok(Digest {
            title: captions.title,
            transcript: captions.subtitle_text,
            summary,
        })
    }
}
