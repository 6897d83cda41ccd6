pub mod audio_extractor;
