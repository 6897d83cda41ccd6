use serde::Serialize;

/// Sub-segment time alignment for one transcribed word.
///
/// `start` is absent when the recognizer could not anchor the word; callers
/// fall back to the owning segment's start time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordTiming {
    pub word: String,
    pub start: Option<f64>,
    pub end: f64,
}

/// A contiguous span of transcribed speech with aggregate text, a time
/// range, and word-level timings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub words: Vec<WordTiming>,
}

impl TranscriptSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// The transcript artifact exchanged between pipeline stages. Never
/// persisted; it lives only for the request that produced it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
