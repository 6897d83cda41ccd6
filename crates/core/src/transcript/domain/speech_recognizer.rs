use std::path::Path;

use thiserror::Error;

use super::transcript::Transcript;

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("failed to decode audio file {path}: {reason}")]
    AudioDecode { path: String, reason: String },
    #[error("speech recognition failed: {0}")]
    Inference(String),
}

/// Domain interface for speech-to-text transcription.
///
/// Implementations take a playable audio file and produce a transcript with
/// word-level timestamps. A single instance is not declared safe for
/// concurrent invocation; callers serialize access or use one instance per
/// in-flight request.
pub trait SpeechRecognizer: Send {
    fn transcribe(&self, audio: &Path) -> Result<Transcript, RecognizeError>;
}
