pub mod ffmpeg_extractor;
