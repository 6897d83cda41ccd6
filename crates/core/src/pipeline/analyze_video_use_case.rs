use std::path::PathBuf;

use thiserror::Error;

use crate::acquisition::domain::video_fetcher::{FetchError, VideoFetcher};
use crate::shared::scratch::ScratchFile;
use crate::transcript::domain::keyword_matcher::{KeywordMatch, KeywordMatcher};

use super::transcriber_provider::TranscriberProvider;
use super::video_transcriber::TranscribeVideoError;

/// Pipeline stage at which a request failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Acquisition,
    Transcription,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Acquisition => write!(f, "acquisition"),
            Stage::Transcription => write!(f, "transcription"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("acquisition failed: {0}")]
    Acquisition(#[from] FetchError),
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscribeVideoError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Acquisition(_) => Stage::Acquisition,
            PipelineError::Transcription(_) => Stage::Transcription,
        }
    }
}

/// End-to-end request orchestration: fetch the video, transcribe it, and
/// locate keywords.
///
/// The stages run strictly in sequence — acquisition, transcription,
/// matching — and the downloaded video is deleted exactly once before
/// `run` returns, on success and on failure at any later stage. The inner
/// audio scratch file is the transcriber's own responsibility.
pub struct AnalyzeVideoUseCase {
    fetcher: Box<dyn VideoFetcher>,
    provider: Box<dyn TranscriberProvider>,
    scratch_dir: PathBuf,
}

impl AnalyzeVideoUseCase {
    pub fn new(
        fetcher: Box<dyn VideoFetcher>,
        provider: Box<dyn TranscriberProvider>,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            provider,
            scratch_dir,
        }
    }

    pub fn run(
        &mut self,
        video_url: &str,
        keywords: &[String],
    ) -> Result<Vec<KeywordMatch>, PipelineError> {
        let video_path = self.fetcher.fetch(video_url, &self.scratch_dir)?;
        // From here on the video is request-scoped; the guard deletes it on
        // every exit below, error paths included.
        let video = ScratchFile::new(video_path);

        let transcriber = self.provider.acquire()?;
        let transcript = transcriber.transcribe(video.path())?;

        let matches = if keywords.is_empty() {
            Vec::new()
        } else {
            KeywordMatcher::search(&transcript, keywords)
        };

        log::info!(
            "found {} matches for {} keywords in {video_url}",
            matches.len(),
            keywords.len()
        );
        Ok(matches)
    }
}
