use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no audio track in {path}")]
    NoAudioTrack { path: String },
    #[error("audio extraction failed for {path}: {reason}")]
    Ffmpeg { path: String, reason: String },
}

/// Domain interface for extracting a video's audio track to a playable
/// audio file.
pub trait AudioExtractor: Send {
    /// Decode the audio track of `video` and write it to `audio_out`.
    /// The caller owns `audio_out` on success and must delete it before
    /// the request completes.
    fn extract(&self, video: &Path, audio_out: &Path) -> Result<(), ExtractError>;
}
