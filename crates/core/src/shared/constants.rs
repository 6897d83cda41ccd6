pub const WHISPER_TINY_MODEL_NAME: &str = "ggml-tiny.en.bin";
pub const WHISPER_TINY_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.en.bin";

pub const WHISPER_BASE_MODEL_NAME: &str = "ggml-base.en.bin";
pub const WHISPER_BASE_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin";

pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Quality cap for downloaded video. Bounds download latency and scratch
/// disk use; transcription only needs the audio track.
pub const MAX_DOWNLOAD_HEIGHT: u32 = 480;
