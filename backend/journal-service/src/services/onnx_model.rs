use crate::error::ClassifierError;
use crate::services::sentiment_model::SentimentModel;
use ndarray::Array2;
use ort::session::{Session, SessionInputValue, SessionOutputs};
use ort::value::Tensor;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::{Tokenizer, TruncationParams};

/// Model the ONNX export is expected to come from
pub const DEFAULT_MODEL_ID: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

const MAX_SEQUENCE_LENGTH: usize = 512;

#[derive(Debug, Default, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Sentiment classifier backed by an ONNX sequence-classification export
pub struct OnnxSentimentModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    id2label: HashMap<usize, String>,
}

impl OnnxSentimentModel {
    /// Load `model.onnx`, `tokenizer.json` and the optional `config.json` from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let dir = dir.as_ref();
        let model_path = dir.join(MODEL_FILE);

        if !model_path.exists() {
            return Err(ClassifierError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        let session = Session::builder()
            .map_err(|e| ClassifierError::OnnxRuntime(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e| ClassifierError::OnnxRuntime(e.to_string()))?;

        let tokenizer = Self::load_tokenizer(&dir.join(TOKENIZER_FILE))?;
        let id2label = load_id2label(&dir.join(CONFIG_FILE))?;

        tracing::info!(
            model_path = %model_path.display(),
            labels = id2label.len(),
            "ONNX sentiment model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            id2label,
        })
    }

    fn load_tokenizer(path: &Path) -> Result<Tokenizer, ClassifierError> {
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
            ClassifierError::Tokenizer(format!(
                "Failed to load tokenizer from {}: {}",
                path.display(),
                e
            ))
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        Ok(tokenizer)
    }

    /// Tokenize text into `[1, seq]` id and mask tensors
    fn encode(&self, text: &str) -> Result<(Array2<i64>, Array2<i64>), ClassifierError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let len = ids.len();

        let input_ids = Array2::from_shape_vec((1, len), ids)
            .map_err(|e| ClassifierError::Internal(e.to_string()))?;
        let attention_mask = Array2::from_shape_vec((1, len), mask)
            .map_err(|e| ClassifierError::Internal(e.to_string()))?;

        Ok((input_ids, attention_mask))
    }

    /// Run inference and return the index of the highest logit
    fn run_inference(
        &self,
        input_ids: Array2<i64>,
        attention_mask: Array2<i64>,
    ) -> Result<usize, ClassifierError> {
        let input_ids = Tensor::from_array(input_ids)
            .map_err(|e| ClassifierError::OnnxRuntime(e.to_string()))?;
        let attention_mask = Tensor::from_array(attention_mask)
            .map_err(|e| ClassifierError::OnnxRuntime(e.to_string()))?;

        let inputs: Vec<(Cow<'_, str>, SessionInputValue<'_>)> = vec![
            (Cow::Borrowed("input_ids"), SessionInputValue::from(input_ids)),
            (
                Cow::Borrowed("attention_mask"),
                SessionInputValue::from(attention_mask),
            ),
        ];

        // Inference requires exclusive access to the session
        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifierError::Internal(format!("Failed to lock session: {}", e)))?;

        let outputs: SessionOutputs = session
            .run(inputs)
            .map_err(|e| ClassifierError::OnnxRuntime(e.to_string()))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| ClassifierError::MalformedOutput("No logits tensor".to_string()))?;

        let (_, scores) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::MalformedOutput(e.to_string()))?;

        argmax(scores)
    }

    fn label_for(&self, index: usize) -> String {
        self.id2label
            .get(&index)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{}", index))
    }
}

impl SentimentModel for OnnxSentimentModel {
    fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        let (input_ids, attention_mask) = self.encode(text)?;
        let index = self.run_inference(input_ids, attention_mask)?;
        Ok(self.label_for(index))
    }
}

/// Read `id2label` from a HuggingFace `config.json`; a missing file yields an empty map
fn load_id2label(path: &Path) -> Result<HashMap<usize, String>, ClassifierError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No model config, using LABEL_<n> names");
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ClassifierError::Internal(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config: ModelConfig = serde_json::from_str(&content).map_err(|e| {
        ClassifierError::Internal(format!("Invalid model config {}: {}", path.display(), e))
    })?;

    config
        .id2label
        .into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .map_err(|_| ClassifierError::Internal(format!("Invalid id2label key '{}'", id)))
        })
        .collect()
}

fn argmax(scores: &[f32]) -> Result<usize, ClassifierError> {
    if scores.is_empty() {
        return Err(ClassifierError::MalformedOutput("Empty logits".to_string()));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifierError::MalformedOutput(
            "Non-finite logits".to_string(),
        ));
    }

    let mut best = 0;
    for (idx, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = idx;
        }
    }
    Ok(best)
}
