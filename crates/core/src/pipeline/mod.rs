pub mod analyze_video_use_case;
pub mod transcriber_provider;
pub mod video_transcriber;
