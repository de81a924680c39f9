//! Sentiment scoring.
//!
//! [`SentimentScorer`] is the seam: given a text, return its
//! positive/neutral/negative proportions. The built-in implementation is
//! a weighted-lexicon analyzer ([`LexiconScorer`]); tests substitute
//! deterministic stubs.

pub mod lexicon;

pub use lexicon::LexiconScorer;

/// Polarity proportions for a single text. Each component is in [0, 1]
/// and the three sum to ≈1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSample {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentSample {
    /// A fully neutral sample, used for empty or unscorable text.
    #[must_use]
    pub fn fully_neutral() -> Self {
        Self {
            positive: 0.0,
            neutral: 1.0,
            negative: 0.0,
        }
    }

    /// Sum of the three components; ≈1 for a well-formed sample.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

/// Maps a text to its polarity proportions. Implementations must be
/// deterministic: the same text always yields the same sample.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentSample;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_neutral_sums_to_one() {
        let sample = SentimentSample::fully_neutral();
        assert!((sample.total() - 1.0).abs() < 1e-9);
        assert_eq!(sample.neutral, 1.0);
    }
}
