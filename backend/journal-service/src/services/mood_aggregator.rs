use crate::models::{MoodSummary, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Per-label weights of the mood score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentWeights {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Default for SentimentWeights {
    fn default() -> Self {
        Self {
            positive: 2.0,
            neutral: 1.0,
            negative: 0.0,
        }
    }
}

/// Inclusive lower bounds of the positive and neutral trend buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendThresholds {
    pub positive: f64,
    pub neutral: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            positive: 1.5,
            neutral: 0.5,
        }
    }
}

/// Reduces a collection of entry labels to a mood summary
#[derive(Debug, Clone, Copy, Default)]
pub struct MoodAggregator {
    weights: SentimentWeights,
    thresholds: TrendThresholds,
}

impl MoodAggregator {
    pub fn new(weights: SentimentWeights, thresholds: TrendThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn summarize<I>(&self, labels: I) -> MoodSummary
    where
        I: IntoIterator<Item = SentimentLabel>,
    {
        let mut summary = MoodSummary::empty();

        for label in labels {
            match label {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
                SentimentLabel::Negative => summary.negative += 1,
            }
            summary.total += 1;
        }

        summary.average_sentiment = self
            .score(&summary)
            .map(|score| self.trend_for_score(score))
            .unwrap_or(SentimentLabel::Neutral);

        summary
    }

    /// Weighted mean of the summary's counts, `None` when there are no entries
    pub fn score(&self, summary: &MoodSummary) -> Option<f64> {
        if summary.total == 0 {
            return None;
        }

        let weighted = summary.positive as f64 * self.weights.positive
            + summary.neutral as f64 * self.weights.neutral
            + summary.negative as f64 * self.weights.negative;

        Some(weighted / summary.total as f64)
    }

    pub fn trend_for_score(&self, score: f64) -> SentimentLabel {
        if score >= self.thresholds.positive {
            SentimentLabel::Positive
        } else if score >= self.thresholds.neutral {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Negative
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SentimentLabel::{Negative, Neutral, Positive};

    #[test]
    fn test_empty_is_neutral() {
        let summary = MoodAggregator::default().summarize(Vec::new());
        assert_eq!(summary, MoodSummary::empty());
        assert_eq!(MoodAggregator::default().score(&summary), None);
    }

    #[test]
    fn test_mostly_positive() {
        let aggregator = MoodAggregator::default();
        let summary = aggregator.summarize([Positive, Positive, Neutral]);
        assert_eq!(
            (summary.positive, summary.neutral, summary.negative, summary.total),
            (2, 1, 0, 3)
        );
        let score = aggregator.score(&summary).unwrap();
        assert!((score - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.average_sentiment, Positive);
    }

    #[test]
    fn test_mixed_is_neutral() {
        let summary = MoodAggregator::default().summarize([Negative, Negative, Positive]);
        assert_eq!(
            (summary.positive, summary.neutral, summary.negative, summary.total),
            (1, 0, 2, 3)
        );
        assert_eq!(summary.average_sentiment, Neutral);
    }

    #[test]
    fn test_all_negative() {
        let aggregator = MoodAggregator::default();
        let summary = aggregator.summarize([Negative, Negative, Negative]);
        assert_eq!(aggregator.score(&summary), Some(0.0));
        assert_eq!(summary.average_sentiment, Negative);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let aggregator = MoodAggregator::default();

        // (2 + 1) / 2 = 1.5
        let summary = aggregator.summarize([Positive, Neutral]);
        assert_eq!(aggregator.score(&summary), Some(1.5));
        assert_eq!(summary.average_sentiment, Positive);

        // (1 + 0) / 2 = 0.5
        let summary = aggregator.summarize([Neutral, Negative]);
        assert_eq!(aggregator.score(&summary), Some(0.5));
        assert_eq!(summary.average_sentiment, Neutral);

        // (2 + 0 + 0 + 0) / 4 = 0.5
        let summary = aggregator.summarize([Positive, Negative, Negative, Negative]);
        assert_eq!(summary.average_sentiment, Neutral);

        assert_eq!(aggregator.trend_for_score(1.4999), Neutral);
        assert_eq!(aggregator.trend_for_score(0.4999), Negative);
        assert_eq!(aggregator.trend_for_score(2.0), Positive);
    }

    #[test]
    fn test_counts_sum_to_total() {
        let labels: Vec<SentimentLabel> = (0..100)
            .map(|i| SentimentLabel::ALL[i % 3])
            .collect();
        let summary = MoodAggregator::default().summarize(labels.iter().copied());
        assert_eq!(summary.total, 100);
        assert_eq!(
            summary.positive + summary.neutral + summary.negative,
            summary.total
        );
    }

    #[test]
    fn test_order_does_not_matter_and_is_repeatable() {
        let aggregator = MoodAggregator::default();
        let labels = vec![Positive, Negative, Neutral, Positive, Negative];
        let mut reversed = labels.clone();
        reversed.reverse();

        let first = aggregator.summarize(labels.clone());
        assert_eq!(first, aggregator.summarize(labels));
        assert_eq!(first, aggregator.summarize(reversed));
    }

    #[test]
    fn test_custom_thresholds() {
        let aggregator = MoodAggregator::new(
            SentimentWeights::default(),
            TrendThresholds {
                positive: 1.8,
                neutral: 0.2,
            },
        );
        let summary = aggregator.summarize([Positive, Positive, Neutral]);
        assert_eq!(summary.average_sentiment, Neutral);
    }
}
