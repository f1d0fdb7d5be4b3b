use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label attached to a journal entry.
///
/// Variant order is the weighting order used by mood aggregation:
/// `Negative < Neutral < Positive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSentiment(pub String);

impl fmt::Display for UnknownSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sentiment label: {}", self.0)
    }
}

impl std::error::Error for UnknownSentiment {}

impl FromStr for SentimentLabel {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            "positive" => Ok(SentimentLabel::Positive),
            other => Err(UnknownSentiment(other.to_string())),
        }
    }
}

/// Per-owner mood trend, recomputed on every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
    pub average_sentiment: SentimentLabel,
}

impl MoodSummary {
    pub fn empty() -> Self {
        Self {
            positive: 0,
            neutral: 0,
            negative: 0,
            total: 0,
            average_sentiment: SentimentLabel::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order() {
        assert!(SentimentLabel::Negative < SentimentLabel::Neutral);
        assert!(SentimentLabel::Neutral < SentimentLabel::Positive);
    }

    #[test]
    fn test_label_wire_format() {
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Positive).unwrap(),
            "\"positive\""
        );
        let parsed: SentimentLabel = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(parsed, SentimentLabel::Negative);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!("neutral".parse::<SentimentLabel>(), Ok(SentimentLabel::Neutral));
        assert!("Positive".parse::<SentimentLabel>().is_err());
        assert!("mixed".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_summary_serializes_api_shape() {
        let json = serde_json::to_value(MoodSummary::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "positive": 0,
                "neutral": 0,
                "negative": 0,
                "total": 0,
                "average_sentiment": "neutral"
            })
        );
    }
}
