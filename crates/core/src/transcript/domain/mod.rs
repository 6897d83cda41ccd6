pub mod keyword_matcher;
pub mod speech_recognizer;
pub mod transcript;
