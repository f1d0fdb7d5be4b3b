use crate::error::ClassifierError;
use crate::metrics;
use crate::models::SentimentLabel;
use crate::services::keyword_heuristic::KeywordHeuristic;
use crate::services::onnx_model::OnnxSentimentModel;
use crate::services::sentiment_model::{normalize_label, SentimentModel};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Default bound on inferences running on the blocking pool at once
pub const DEFAULT_MAX_INFLIGHT: usize = 16;

/// Builds the model on first use
pub type ModelLoader =
    Box<dyn Fn() -> Result<Arc<dyn SentimentModel>, ClassifierError> + Send + Sync>;

/// Which path produced a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    Model,
    Fallback,
}

impl LabelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::Model => "model",
            LabelSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub source: LabelSource,
}

/// Sentiment classifier with a model-backed primary path and a keyword fallback.
///
/// The model is constructed at most once, on the first classification, and
/// reused for the lifetime of the classifier. Concurrent first callers block on
/// a single initializer. A failed load leaves the cell empty so the next call
/// tries again; every failed attempt is answered by the fallback.
pub struct SentimentClassifier {
    loader: Option<ModelLoader>,
    model: OnceCell<Arc<dyn SentimentModel>>,
    heuristic: KeywordHeuristic,
    inflight: Arc<Semaphore>,
}

impl SentimentClassifier {
    pub fn new(loader: ModelLoader, heuristic: KeywordHeuristic) -> Self {
        Self {
            loader: Some(loader),
            model: OnceCell::new(),
            heuristic,
            inflight: Arc::new(Semaphore::new(DEFAULT_MAX_INFLIGHT)),
        }
    }

    /// Classifier whose primary path is disabled; every label comes from the heuristic
    pub fn heuristic_only(heuristic: KeywordHeuristic) -> Self {
        Self {
            loader: None,
            model: OnceCell::new(),
            heuristic,
            inflight: Arc::new(Semaphore::new(DEFAULT_MAX_INFLIGHT)),
        }
    }

    /// Classifier backed by the ONNX export in `dir`
    pub fn from_model_dir(dir: impl Into<PathBuf>, heuristic: KeywordHeuristic) -> Self {
        let dir = dir.into();
        let loader: ModelLoader = Box::new(move || {
            let model = OnnxSentimentModel::load(&dir)?;
            Ok(Arc::new(model) as Arc<dyn SentimentModel>)
        });
        Self::new(loader, heuristic)
    }

    /// Bound the inferences [`classify_off_thread`] keeps on the blocking pool (minimum 1)
    pub fn with_max_inflight(mut self, limit: usize) -> Self {
        self.inflight = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Classify text. Total: a primary-path failure is logged and answered by the fallback.
    pub fn classify(&self, text: &str) -> SentimentLabel {
        self.classify_detailed(text).label
    }

    pub fn classify_detailed(&self, text: &str) -> Classification {
        let start = Instant::now();
        let classification = self.classify_unrecorded(text);
        metrics::record_classification(classification.source, start.elapsed());
        classification
    }

    fn classify_unrecorded(&self, text: &str) -> Classification {
        match self.classify_with_model(text) {
            Ok(label) => Classification {
                label,
                source: LabelSource::Model,
            },
            Err(e) => {
                self.report_failure(&e);
                self.fallback_classification(text)
            }
        }
    }

    /// Primary path alone
    pub fn classify_with_model(&self, text: &str) -> Result<SentimentLabel, ClassifierError> {
        let model = self.model()?;
        let raw = model.predict(text)?;
        normalize_label(&raw)
    }

    /// Fallback path alone
    pub fn fallback(&self, text: &str) -> SentimentLabel {
        self.heuristic.classify(text)
    }

    fn fallback_classification(&self, text: &str) -> Classification {
        Classification {
            label: self.fallback(text),
            source: LabelSource::Fallback,
        }
    }

    fn model(&self) -> Result<&Arc<dyn SentimentModel>, ClassifierError> {
        let loader = self.loader.as_ref().ok_or(ClassifierError::ModelDisabled)?;

        self.model.get_or_try_init(|| {
            tracing::info!("Loading sentiment model...");
            loader().map_err(|e| {
                metrics::record_model_load_failure();
                e
            })
        })
    }

    fn report_failure(&self, error: &ClassifierError) {
        match error {
            // Expected when no model is configured
            ClassifierError::ModelDisabled => {
                tracing::debug!("Sentiment model disabled, using keyword heuristic")
            }
            other => tracing::warn!(
                error = %other,
                kind = other.kind(),
                "Sentiment model failed, using keyword heuristic"
            ),
        }
    }
}

/// Classify on the blocking pool so inference never stalls the async executor.
///
/// With `timeout` set, a model that has not answered in time is abandoned and
/// the fallback label is returned. The abandoned inference still runs to
/// completion on its blocking thread and keeps its in-flight permit until then.
/// When every permit is taken the fallback answers without queueing more work.
/// Each call records exactly one classification sample.
pub async fn classify_off_thread(
    classifier: Arc<SentimentClassifier>,
    text: String,
    timeout: Option<Duration>,
) -> Classification {
    let start = Instant::now();

    let permit = match classifier.inflight.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            tracing::warn!("Sentiment inference saturated, using keyword heuristic");
            let classification = classifier.fallback_classification(&text);
            metrics::record_classification(classification.source, start.elapsed());
            return classification;
        }
    };

    let worker = classifier.clone();
    let worker_text = text.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        worker.classify_unrecorded(&worker_text)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                classifier.report_failure(&ClassifierError::Timeout(limit));
                Ok(classifier.fallback_classification(&text))
            }
        },
        None => task.await,
    };

    let classification = joined.unwrap_or_else(|e| {
        classifier.report_failure(&ClassifierError::Internal(format!(
            "classification task failed: {}",
            e
        )));
        classifier.fallback_classification(&text)
    });

    metrics::record_classification(classification.source, start.elapsed());
    classification
}
