use crate::error::ClassifierError;
use crate::models::SentimentLabel;

/// Pretrained three-way polarity classifier.
///
/// `predict` returns the model's own label identifier (`LABEL_2`, `positive`, ...);
/// callers map it to [`SentimentLabel`] with [`normalize_label`].
pub trait SentimentModel: Send + Sync {
    fn predict(&self, text: &str) -> Result<String, ClassifierError>;
}

/// Map a raw model label to the domain vocabulary.
///
/// Accepts both the `LABEL_<n>` numbering (0 = negative, 1 = neutral, 2 = positive)
/// and polarity words, case-insensitively.
pub fn normalize_label(raw: &str) -> Result<SentimentLabel, ClassifierError> {
    match raw.trim().to_uppercase().as_str() {
        "LABEL_2" | "POSITIVE" => Ok(SentimentLabel::Positive),
        "LABEL_1" | "NEUTRAL" => Ok(SentimentLabel::Neutral),
        "LABEL_0" | "NEGATIVE" => Ok(SentimentLabel::Negative),
        _ => Err(ClassifierError::MalformedOutput(format!(
            "unrecognized label '{}'",
            raw
        ))),
    }
}
