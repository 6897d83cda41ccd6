use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::domain::audio_extractor::{AudioExtractor, ExtractError};
use crate::shared::scratch::ScratchFile;
use crate::transcript::domain::speech_recognizer::{RecognizeError, SpeechRecognizer};
use crate::transcript::domain::transcript::Transcript;

#[derive(Error, Debug)]
pub enum TranscribeVideoError {
    #[error("failed to construct transcriber: {reason}")]
    Construction { reason: String },
    #[error("video file not found: {path}")]
    VideoNotFound { path: PathBuf },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Recognize(#[from] RecognizeError),
}

/// Turns a local video file into a word-timestamped transcript.
///
/// Composes the audio-extraction and speech-recognition collaborators and
/// owns the intermediate audio file: a [`ScratchFile`] guard deletes it
/// before `transcribe` returns on every path, including recognition
/// failure and panic unwind.
pub struct VideoTranscriber {
    extractor: Box<dyn AudioExtractor>,
    recognizer: Box<dyn SpeechRecognizer>,
    scratch_dir: PathBuf,
}

impl VideoTranscriber {
    pub fn new(
        extractor: Box<dyn AudioExtractor>,
        recognizer: Box<dyn SpeechRecognizer>,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            extractor,
            recognizer,
            scratch_dir,
        }
    }

    pub fn transcribe(&self, video: &Path) -> Result<Transcript, TranscribeVideoError> {
        if !video.exists() {
            return Err(TranscribeVideoError::VideoNotFound {
                path: video.to_path_buf(),
            });
        }

        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let audio_path = self.scratch_dir.join(format!("{stem}_audio.wav"));

        self.extractor.extract(video, &audio_path)?;
        let audio = ScratchFile::new(audio_path);

        log::info!("transcribing {}", video.display());
        let transcript = self.recognizer.transcribe(audio.path())?;
        log::info!(
            "transcription complete: {} segments",
            transcript.segments.len()
        );

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::domain::transcript::{TranscriptSegment, WordTiming};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct StubExtractor;

    impl AudioExtractor for StubExtractor {
        fn extract(&self, _video: &Path, audio_out: &Path) -> Result<(), ExtractError> {
            std::fs::write(audio_out, b"wav").unwrap();
            Ok(())
        }
    }

    struct FailingExtractor;

    impl AudioExtractor for FailingExtractor {
        fn extract(&self, video: &Path, _audio_out: &Path) -> Result<(), ExtractError> {
            Err(ExtractError::NoAudioTrack {
                path: video.display().to_string(),
            })
        }
    }

    struct StubRecognizer {
        transcript: Transcript,
        saw_audio_file: Arc<AtomicBool>,
    }

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(&self, audio: &Path) -> Result<Transcript, RecognizeError> {
            self.saw_audio_file.store(audio.exists(), Ordering::SeqCst);
            Ok(self.transcript.clone())
        }
    }

    struct FailingRecognizer;

    impl SpeechRecognizer for FailingRecognizer {
        fn transcribe(&self, _audio: &Path) -> Result<Transcript, RecognizeError> {
            Err(RecognizeError::Inference("model exploded".to_string()))
        }
    }

    fn one_segment_transcript() -> Transcript {
        Transcript {
            segments: vec![TranscriptSegment {
                text: "hello world".to_string(),
                start: 0.0,
                end: 1.0,
                words: vec![WordTiming {
                    word: "hello".to_string(),
                    start: Some(0.0),
                    end: 0.4,
                }],
            }],
        }
    }

    fn fake_video(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"video").unwrap();
        path
    }

    #[test]
    fn test_missing_video_is_not_found_without_extraction() {
        let tmp = TempDir::new().unwrap();
        let transcriber = VideoTranscriber::new(
            Box::new(FailingExtractor),
            Box::new(FailingRecognizer),
            tmp.path().to_path_buf(),
        );
        let result = transcriber.transcribe(&tmp.path().join("absent.mp4"));
        assert!(matches!(
            result,
            Err(TranscribeVideoError::VideoNotFound { .. })
        ));
    }

    #[test]
    fn test_success_returns_transcript_and_removes_audio() {
        let tmp = TempDir::new().unwrap();
        let video = fake_video(&tmp);
        let saw = Arc::new(AtomicBool::new(false));
        let transcriber = VideoTranscriber::new(
            Box::new(StubExtractor),
            Box::new(StubRecognizer {
                transcript: one_segment_transcript(),
                saw_audio_file: saw.clone(),
            }),
            tmp.path().to_path_buf(),
        );

        let transcript = transcriber.transcribe(&video).unwrap();
        assert_eq!(transcript.segments.len(), 1);
        // The recognizer saw the extracted file, and it is gone afterwards.
        assert!(saw.load(Ordering::SeqCst));
        assert!(!tmp.path().join("clip_audio.wav").exists());
    }

    #[test]
    fn test_recognition_failure_still_removes_audio() {
        let tmp = TempDir::new().unwrap();
        let video = fake_video(&tmp);
        let transcriber = VideoTranscriber::new(
            Box::new(StubExtractor),
            Box::new(FailingRecognizer),
            tmp.path().to_path_buf(),
        );

        let result = transcriber.transcribe(&video);
        assert!(matches!(
            result,
            Err(TranscribeVideoError::Recognize(_))
        ));
        assert!(!tmp.path().join("clip_audio.wav").exists());
    }

    #[test]
    fn test_extraction_failure_maps_to_extract_error() {
        let tmp = TempDir::new().unwrap();
        let video = fake_video(&tmp);
        let transcriber = VideoTranscriber::new(
            Box::new(FailingExtractor),
            Box::new(FailingRecognizer),
            tmp.path().to_path_buf(),
        );
        let result = transcriber.transcribe(&video);
        assert!(matches!(result, Err(TranscribeVideoError::Extract(_))));
    }
}
