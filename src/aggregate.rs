//! Sentiment aggregation.
//!
//! Folds per-reply sentiment samples into one averaged summary per post
//! label. Labels with zero replies are never divided by zero — they are
//! collected separately and reported as lacking data.

use std::collections::BTreeMap;

use crate::model::PostCollection;
use crate::sentiment::{SentimentSample, SentimentScorer};

/// Averaged polarity proportions for one post label.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSentimentSummary {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    /// Number of replies the average was taken over. Always ≥ 1.
    pub reply_count: usize,
}

/// Aggregation output: per-label averages plus labels with no replies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentDigest {
    /// Label → averaged summary, in label order for stable reports.
    pub summaries: BTreeMap<String, PostSentimentSummary>,
    /// Labels whose posts had zero replies, in first-seen order.
    pub no_replies: Vec<String>,
}

impl SentimentDigest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.no_replies.is_empty()
    }
}

/// Running sums for one label during accumulation.
#[derive(Default)]
struct Accumulator {
    positive: f64,
    neutral: f64,
    negative: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, sample: SentimentSample) {
        self.positive += sample.positive;
        self.neutral += sample.neutral;
        self.negative += sample.negative;
        self.count += 1;
    }
}

/// Score every reply in the collection and average per post label.
///
/// Posts sharing a label (same author and text) accumulate into the same
/// summary. Deterministic for a deterministic scorer; iteration order
/// never affects the numbers, only addition is involved.
pub fn summarize(
    collection: &PostCollection,
    scorer: &dyn SentimentScorer,
) -> SentimentDigest {
    let mut sums: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut seen_order: Vec<String> = Vec::new();

    for post in collection.posts() {
        let label = post.label();
        if !seen_order.contains(&label) {
            seen_order.push(label.clone());
        }
        let acc = sums.entry(label).or_default();

        for reply in &post.replies {
            acc.add(scorer.score(reply));
        }
    }

    let mut digest = SentimentDigest::default();
    for label in seen_order {
        let acc = &sums[&label];
        if acc.count == 0 {
            tracing::debug!(label = %label, "no replies, excluded from averaging");
            digest.no_replies.push(label);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = acc.count as f64;
            digest.summaries.insert(
                label,
                PostSentimentSummary {
                    positive: acc.positive / n,
                    neutral: acc.neutral / n,
                    negative: acc.negative / n,
                    reply_count: acc.count,
                },
            );
        }
    }

    tracing::info!(
        summarized = digest.summaries.len(),
        without_data = digest.no_replies.len(),
        "aggregation complete"
    );
    digest
}
