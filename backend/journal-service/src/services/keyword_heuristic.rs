use crate::models::SentimentLabel;

pub const DEFAULT_POSITIVE_KEYWORDS: &[&str] = &[
    "happy",
    "joy",
    "great",
    "good",
    "love",
    "wonderful",
    "amazing",
    "excited",
    "grateful",
];

pub const DEFAULT_NEGATIVE_KEYWORDS: &[&str] = &[
    "sad",
    "bad",
    "angry",
    "frustrated",
    "depressed",
    "worried",
    "anxious",
    "stress",
];

/// Keyword-count sentiment heuristic used when the model path is unavailable
#[derive(Debug, Clone)]
pub struct KeywordHeuristic {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for KeywordHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_POSITIVE_KEYWORDS, DEFAULT_NEGATIVE_KEYWORDS)
    }
}

impl KeywordHeuristic {
    pub fn new<S: AsRef<str>>(positive: &[S], negative: &[S]) -> Self {
        let normalize = |words: &[S]| {
            words
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
        };

        Self {
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    /// Classify text by comparing positive and negative keyword hits
    pub fn classify(&self, text: &str) -> SentimentLabel {
        let normalized = text.to_lowercase();
        let (pos_count, neg_count) = self.counts(&normalized);

        tracing::debug!(pos_count, neg_count, "Keyword heuristic counts");

        match pos_count.cmp(&neg_count) {
            std::cmp::Ordering::Greater => SentimentLabel::Positive,
            std::cmp::Ordering::Less => SentimentLabel::Negative,
            std::cmp::Ordering::Equal => SentimentLabel::Neutral,
        }
    }

    /// Number of keywords from each set contained in already lower-cased text.
    ///
    /// Substring containment: "goodness" hits "good", and a keyword counts once
    /// regardless of how often it repeats.
    fn counts(&self, normalized: &str) -> (usize, usize) {
        let hits = |words: &[String]| words.iter().filter(|w| normalized.contains(w.as_str())).count();
        (hits(&self.positive), hits(&self.negative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let heuristic = KeywordHeuristic::default();
        assert_eq!(
            heuristic.classify("I feel happy and grateful"),
            SentimentLabel::Positive
        );
    }

    #[test]
    fn test_negative_text() {
        let heuristic = KeywordHeuristic::default();
        assert_eq!(
            heuristic.classify("I am sad and anxious"),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_no_keywords_is_neutral() {
        let heuristic = KeywordHeuristic::default();
        assert_eq!(heuristic.classify("The sky is blue"), SentimentLabel::Neutral);
        assert_eq!(heuristic.classify(""), SentimentLabel::Neutral);
    }

    #[test]
    fn test_tie_is_neutral() {
        let heuristic = KeywordHeuristic::default();
        assert_eq!(heuristic.classify("happy but sad"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_case_insensitive() {
        let heuristic = KeywordHeuristic::default();
        assert_eq!(heuristic.classify("AMAZING DAY"), SentimentLabel::Positive);
    }

    #[test]
    fn test_substring_matches_mid_word() {
        let heuristic = KeywordHeuristic::default();
        // "stressful" contains "stress", "badminton" contains "bad"
        assert_eq!(
            heuristic.classify("A stressful badminton match"),
            SentimentLabel::Negative
        );
        assert_eq!(heuristic.classify("Goodness me"), SentimentLabel::Positive);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let heuristic = KeywordHeuristic::default();
        // one distinct positive keyword vs two distinct negative keywords
        assert_eq!(
            heuristic.classify("good good good good, but sad and worried"),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_custom_keywords() {
        let heuristic = KeywordHeuristic::new(&["Sunny"], &["rain"]);
        assert_eq!(heuristic.classify("sunny afternoon"), SentimentLabel::Positive);
        assert_eq!(heuristic.classify("rain again"), SentimentLabel::Negative);
        assert_eq!(heuristic.classify("happy"), SentimentLabel::Neutral);
    }
}
