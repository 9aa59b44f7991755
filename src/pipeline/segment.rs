//! Sentence boundary detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of terminal punctuation, optional closing quotes or brackets,
/// then whitespace. Generic English rules.
static BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'”’)\]]*\s+"#).expect("valid regex"));

/// Splits text into an ordered sequence of sentences.
///
/// Injectable so tests and non-English hosts can substitute their own
/// boundary rules.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Vec<String>;
}

/// Rule-based splitter for generic English punctuation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleSplitter;

impl SentenceSplitter for RuleSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in BOUNDARY_RE.find_iter(text) {
            let sentence = text[start..boundary.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = boundary.end();
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        sentences
    }
}
