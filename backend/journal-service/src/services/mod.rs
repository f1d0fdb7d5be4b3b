pub mod keyword_heuristic;
pub mod mood_aggregator;
pub mod onnx_model;
pub mod sentiment_classifier;
pub mod sentiment_model;

pub use keyword_heuristic::KeywordHeuristic;
pub use mood_aggregator::{MoodAggregator, SentimentWeights, TrendThresholds};
pub use onnx_model::OnnxSentimentModel;
pub use sentiment_classifier::{
    classify_off_thread, Classification, DEFAULT_MAX_INFLIGHT, LabelSource, ModelLoader, SentimentClassifier,
};
pub use sentiment_model::{normalize_label, SentimentModel};
