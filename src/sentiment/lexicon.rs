//! Weighted-lexicon sentiment analyzer.
//!
//! Each lexicon word carries a valence in [-1, 1]. Scoring walks the
//! tokens, applies intensity modifiers ("very", "slightly") to the next
//! scored word, and inverts valence with damping when a negation appears
//! within a short window before it. The proportions are built VADER-style:
//! positive mass, negative mass, and one unit per neutral token,
//! normalized to sum to 1.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{SentimentSample, SentimentScorer};

/// Tokens a negation may reach forward across.
const NEGATION_WINDOW: usize = 3;

/// Damping applied when a negation inverts a valence.
const NEGATION_DAMPING: f64 = 0.8;

/// Word valences. Positive entries up to 1.0, negative down to -1.0.
static VALENCES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let entries: &[(&str, f64)] = &[
        // Strongly positive
        ("amazing", 0.8),
        ("awesome", 0.75),
        ("best", 0.8),
        ("brilliant", 0.75),
        ("excellent", 0.8),
        ("fantastic", 0.8),
        ("great", 0.7),
        ("hero", 0.7),
        ("incredible", 0.85),
        ("inspiring", 0.7),
        ("love", 0.75),
        ("perfect", 0.8),
        ("wonderful", 0.75),
        // Moderately positive
        ("agree", 0.5),
        ("good", 0.5),
        ("happy", 0.6),
        ("honest", 0.55),
        ("hope", 0.5),
        ("nice", 0.45),
        ("proud", 0.6),
        ("respect", 0.6),
        ("right", 0.35),
        ("strong", 0.5),
        ("support", 0.45),
        ("thank", 0.55),
        ("thanks", 0.55),
        ("true", 0.35),
        ("win", 0.6),
        ("winning", 0.6),
        // Strongly negative
        ("awful", -0.8),
        ("corrupt", -0.75),
        ("disaster", -0.75),
        ("disgrace", -0.8),
        ("fraud", -0.75),
        ("hate", -0.8),
        ("horrible", -0.8),
        ("liar", -0.75),
        ("pathetic", -0.7),
        ("terrible", -0.8),
        ("traitor", -0.8),
        ("worst", -0.85),
        // Moderately negative
        ("angry", -0.6),
        ("bad", -0.55),
        ("crisis", -0.55),
        ("dumb", -0.65),
        ("fail", -0.6),
        ("failure", -0.65),
        ("fear", -0.5),
        ("lie", -0.7),
        ("lies", -0.7),
        ("sad", -0.5),
        ("scandal", -0.6),
        ("shame", -0.65),
        ("sick", -0.5),
        ("stupid", -0.7),
        ("wrong", -0.5),
    ];
    entries.iter().copied().collect()
});

/// Intensity modifiers applied to the next scored word.
static MODIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let entries: &[(&str, f64)] = &[
        ("absolutely", 1.4),
        ("extremely", 1.5),
        ("really", 1.3),
        ("so", 1.2),
        ("totally", 1.3),
        ("very", 1.3),
        ("barely", 0.6),
        ("slightly", 0.7),
        ("somewhat", 0.8),
    ];
    entries.iter().copied().collect()
});

/// Negation markers.
static NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "cannot", "cant", "wont", "isnt", "arent",
    "wasnt", "werent", "dont", "doesnt", "didnt",
];

/// Built-in [`SentimentScorer`] backed by the static lexicon.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentSample {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentSample::fully_neutral();
        }

        let mut positive_mass = 0.0;
        let mut negative_mass = 0.0;
        let mut neutral_count = 0u32;

        let mut modifier = 1.0;
        let mut negated = false;
        let mut since_negation = 0;

        for token in &tokens {
            if NEGATIONS.contains(&token.as_str()) {
                negated = true;
                since_negation = 0;
                continue;
            }

            if let Some(&m) = MODIFIERS.get(token.as_str()) {
                modifier = m;
                continue;
            }

            if let Some(&valence) = VALENCES.get(token.as_str()) {
                let mut score = (valence * modifier).clamp(-1.0, 1.0);
                if negated && since_negation < NEGATION_WINDOW {
                    score = -score * NEGATION_DAMPING;
                    negated = false;
                }
                // VADER-style mass: |valence| + 1 so scored words outweigh
                // neutral tokens, which count 1 each.
                if score > 0.0 {
                    positive_mass += score + 1.0;
                } else {
                    negative_mass += -score + 1.0;
                }
                modifier = 1.0;
            } else {
                neutral_count += 1;
            }

            if negated {
                since_negation += 1;
                if since_negation >= NEGATION_WINDOW {
                    negated = false;
                }
            }
        }

        let total = positive_mass + negative_mass + f64::from(neutral_count);
        if total == 0.0 {
            return SentimentSample::fully_neutral();
        }

        SentimentSample {
            positive: positive_mass / total,
            neutral: f64::from(neutral_count) / total,
            negative: negative_mass / total,
        }
    }
}

/// Lowercase alphabetic tokens; apostrophes are dropped so "don't"
/// becomes "dont" and matches the negation list.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase().replace('\'', ""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized(sample: &SentimentSample) {
        assert!((sample.total() - 1.0).abs() < 1e-9, "sum = {}", sample.total());
        for component in [sample.positive, sample.neutral, sample.negative] {
            assert!((0.0..=1.0).contains(&component));
        }
    }

    #[test]
    fn empty_text_is_fully_neutral() {
        let sample = LexiconScorer::new().score("");
        assert_eq!(sample, SentimentSample::fully_neutral());
    }

    #[test]
    fn unknown_words_are_fully_neutral() {
        let sample = LexiconScorer::new().score("the quick brown fox");
        assert_eq!(sample.neutral, 1.0);
        assert_normalized(&sample);
    }

    #[test]
    fn positive_word_dominates() {
        let sample = LexiconScorer::new().score("great!");
        assert!(sample.positive > sample.negative);
        assert!(sample.positive > sample.neutral);
        assert_normalized(&sample);
    }

    #[test]
    fn negative_word_dominates() {
        let sample = LexiconScorer::new().score("this is terrible");
        assert!(sample.negative > sample.positive);
        assert_normalized(&sample);
    }

    #[test]
    fn negation_flips_polarity() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("good");
        let negated = scorer.score("not good");

        assert!(plain.positive > plain.negative);
        assert!(negated.negative > negated.positive);
        assert_normalized(&negated);
    }

    #[test]
    fn negation_with_apostrophe_is_recognized() {
        let sample = LexiconScorer::new().score("don't love it");
        assert!(sample.negative > sample.positive);
    }

    #[test]
    fn negation_window_expires() {
        // Four neutral tokens between negation and sentiment word.
        let sample = LexiconScorer::new().score("not a b c d great");
        assert!(sample.positive > sample.negative);
    }

    #[test]
    fn modifier_amplifies_valence() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("good stuff here now");
        let boosted = scorer.score("very good stuff here now");
        assert!(boosted.positive > plain.positive);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = LexiconScorer::new();
        let a = scorer.score("great day, terrible weather");
        let b = scorer.score("great day, terrible weather");
        assert_eq!(a, b);
    }

    #[test]
    fn mixed_text_keeps_both_masses() {
        let sample = LexiconScorer::new().score("great policy but terrible delivery");
        assert!(sample.positive > 0.0);
        assert!(sample.negative > 0.0);
        assert_normalized(&sample);
    }
}
