use serde::Serialize;

use crate::shared::timestamp::format_timestamp;

use super::transcript::Transcript;

/// One (keyword, segment) hit reduced to a single timestamp.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub timestamp: String,
    pub text: String,
}

pub struct KeywordMatcher;

impl KeywordMatcher {
    /// Locate keywords in a transcript as ordered, deduplicated matches.
    ///
    /// Each segment contributes at most one match per keyword, anchored at
    /// the first word whose text contains the keyword (case-insensitive
    /// substring). A word without its own start time falls back to the
    /// segment start. The result is sorted by timestamp string; the
    /// fixed-width `HH:MM:SS` format makes lexicographic order
    /// chronological, and the sort is stable so equal timestamps keep
    /// discovery order.
    pub fn search(transcript: &Transcript, keywords: &[String]) -> Vec<KeywordMatch> {
        if transcript.is_empty() || keywords.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for segment in &transcript.segments {
            let segment_text = segment.text.trim();
            let lower_text = segment_text.to_lowercase();

            for keyword in keywords {
                let lower_keyword = keyword.to_lowercase();
                if !lower_text.contains(&lower_keyword) {
                    continue;
                }

                // One match per (keyword, segment): take the first word
                // containing the keyword and stop scanning. If no word
                // token contains it (tokenization can split a substring
                // across word boundaries), the segment hit is dropped.
                for word in &segment.words {
                    if word.word.trim().to_lowercase().contains(&lower_keyword) {
                        let start = word.start.unwrap_or(segment.start);
                        matches.push(KeywordMatch {
                            keyword: keyword.clone(),
                            timestamp: format_timestamp(start),
                            text: segment_text.to_string(),
                        });
                        break;
                    }
                }
            }
        }

        matches.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        matches
    }
}
