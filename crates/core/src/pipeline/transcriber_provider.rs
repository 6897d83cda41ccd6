use super::video_transcriber::{TranscribeVideoError, VideoTranscriber};

/// Policy seam for the model-lifecycle tradeoff: load a fresh model per
/// request, or keep one loaded instance and reuse it.
///
/// `acquire` takes `&mut self` deliberately — the underlying model is not
/// safe for concurrent invocation, so exclusive access serializes callers
/// that share a provider. Deployments wanting parallelism use one provider
/// per worker.
pub trait TranscriberProvider: Send {
    fn acquire(&mut self) -> Result<&VideoTranscriber, TranscribeVideoError>;
}

/// Builds a fresh transcriber for every request and drops it afterwards.
///
/// Pays the model-load cost per request in exchange for a cold process
/// between requests. This mirrors the lightweight-tier one-shot policy the
/// pipeline defaults to.
pub struct PerRequestProvider<F>
where
    F: FnMut() -> Result<VideoTranscriber, TranscribeVideoError> + Send,
{
    build: F,
    current: Option<VideoTranscriber>,
}

impl<F> PerRequestProvider<F>
where
    F: FnMut() -> Result<VideoTranscriber, TranscribeVideoError> + Send,
{
    pub fn new(build: F) -> Self {
        Self {
            build,
            current: None,
        }
    }
}

impl<F> TranscriberProvider for PerRequestProvider<F>
where
    F: FnMut() -> Result<VideoTranscriber, TranscribeVideoError> + Send,
{
    fn acquire(&mut self) -> Result<&VideoTranscriber, TranscribeVideoError> {
        // Replacing the previous instance drops its model before handing
        // out the new one, keeping at most one model resident per provider.
        let fresh = (self.build)()?;
        Ok(&*self.current.insert(fresh))
    }
}

/// Holds one transcriber for the provider's whole lifetime.
///
/// Amortizes the expensive model load across requests; access is
/// serialized through `acquire(&mut self)`.
pub struct PreloadedProvider {
    transcriber: VideoTranscriber,
}

impl PreloadedProvider {
    pub fn new(transcriber: VideoTranscriber) -> Self {
        Self { transcriber }
    }
}

impl TranscriberProvider for PreloadedProvider {
    fn acquire(&mut self) -> Result<&VideoTranscriber, TranscribeVideoError> {
        Ok(&self.transcriber)
    }
}
