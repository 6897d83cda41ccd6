use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::infrastructure::ffmpeg_extractor::decode_audio;
use crate::shared::constants::{
    WHISPER_BASE_MODEL_NAME, WHISPER_BASE_MODEL_URL, WHISPER_SAMPLE_RATE, WHISPER_TINY_MODEL_NAME,
    WHISPER_TINY_MODEL_URL,
};
use crate::shared::model_resolver::{self, ModelResolveError, ProgressFn};
use crate::transcript::domain::speech_recognizer::{RecognizeError, SpeechRecognizer};
use crate::transcript::domain::transcript::{Transcript, TranscriptSegment, WordTiming};

use thiserror::Error;

/// Model size/quality tier. Tiny trades accuracy for load and inference
/// latency; Base is the slower, more accurate option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelTier {
    Tiny,
    Base,
}

impl ModelTier {
    pub fn model_name(self) -> &'static str {
        match self {
            ModelTier::Tiny => WHISPER_TINY_MODEL_NAME,
            ModelTier::Base => WHISPER_BASE_MODEL_NAME,
        }
    }

    pub fn model_url(self) -> &'static str {
        match self {
            ModelTier::Tiny => WHISPER_TINY_MODEL_URL,
            ModelTier::Base => WHISPER_BASE_MODEL_URL,
        }
    }
}

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("whisper model not found at {path}")]
    NotFound { path: PathBuf },
    #[error(transparent)]
    Resolve(#[from] ModelResolveError),
    #[error("failed to load whisper model {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Speech recognizer backed by whisper.cpp via whisper-rs.
///
/// The model is loaded once at construction; a load failure is fatal to
/// the instance. Each `transcribe` call runs on a fresh inference state,
/// but the context itself is not safe for concurrent calls.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
    model_path: PathBuf,
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("model_path", &self.model_path)
            .finish_non_exhaustive()
    }
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, ModelLoadError> {
        if !model_path.exists() {
            return Err(ModelLoadError::NotFound {
                path: model_path.to_path_buf(),
            });
        }

        log::info!("loading whisper model {}", model_path.display());
        let path_str = model_path.to_str().ok_or_else(|| ModelLoadError::Load {
            path: model_path.to_path_buf(),
            reason: "model path is not valid UTF-8".to_string(),
        })?;
        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| ModelLoadError::Load {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            ctx,
            model_path: model_path.to_path_buf(),
        })
    }

    /// Resolve the tier's model file (cache, then download) and load it.
    pub fn for_tier(tier: ModelTier, progress: Option<ProgressFn>) -> Result<Self, ModelLoadError> {
        let path = model_resolver::resolve(tier.model_name(), tier.model_url(), None, progress)?;
        Self::new(&path)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &Path) -> Result<Transcript, RecognizeError> {
        let samples = decode_audio(audio, WHISPER_SAMPLE_RATE)
            .map_err(|e| RecognizeError::AudioDecode {
                path: audio.display().to_string(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| RecognizeError::AudioDecode {
                path: audio.display().to_string(),
                reason: "no audio stream".to_string(),
            })?;

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| RecognizeError::Inference(e.to_string()))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("en"));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_threads());

        state
            .full(params, &samples)
            .map_err(|e| RecognizeError::Inference(e.to_string()))?;

        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let text = segment
                .to_str_lossy()
                .map_err(|e| RecognizeError::Inference(e.to_string()))?
                .trim()
                .to_string();
            // Segment and token timestamps are in centiseconds.
            let start = segment.start_timestamp() as f64 / 100.0;
            let end = segment.end_timestamp() as f64 / 100.0;

            let mut words = Vec::new();
            for tok_idx in 0..segment.n_tokens() {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };
                let token_text = match token.to_str() {
                    Ok(t) => t,
                    Err(_) => continue,
                };

                // Skip special tokens like [_BEG_] and <|endoftext|>.
                let trimmed = token_text.trim();
                if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }

                let data = token.token_data();
                let word_start = data.t0 as f64 / 100.0;
                let word_end = data.t1 as f64 / 100.0;
                if word_end <= word_start {
                    continue;
                }

                words.push(WordTiming {
                    word: trimmed.to_string(),
                    start: Some(word_start),
                    end: word_end,
                });
            }

            segments.push(TranscriptSegment {
                text,
                start,
                end,
                words,
            });
        }

        Ok(Transcript { segments })
    }
}

fn num_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_missing_model_is_not_found() {
        let result = WhisperRecognizer::new(Path::new("/nonexistent/model.bin"));
        assert!(matches!(result, Err(ModelLoadError::NotFound { .. })));
    }

    #[test]
    fn test_new_missing_model_error_names_path() {
        let err = WhisperRecognizer::new(Path::new("/nonexistent/model.bin")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/model.bin"));
    }

    #[test]
    fn test_tier_model_names_differ() {
        assert_ne!(ModelTier::Tiny.model_name(), ModelTier::Base.model_name());
    }

    #[test]
    #[ignore] // Requires a downloaded whisper model and network access
    fn test_transcribe_does_not_crash_on_tone() {
        use crate::audio::infrastructure::ffmpeg_extractor::write_wav;

        let recognizer =
            WhisperRecognizer::for_tier(ModelTier::Tiny, None).expect("model resolution failed");

        // A pure tone should transcribe to little or nothing, but must not
        // error.
        let tmp = tempfile::TempDir::new().unwrap();
        let wav = tmp.path().join("tone.wav");
        let samples: Vec<f32> = (0..48000)
            .map(|i| {
                let t = i as f64 / 16000.0;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32
            })
            .collect();
        write_wav(&wav, &samples, 16000).expect("wav write failed");

        let result = recognizer.transcribe(&wav);
        assert!(result.is_ok(), "transcription errored: {result:?}");
    }
}
