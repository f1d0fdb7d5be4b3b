//! Journal Service
//!
//! Stores journal entries, tags each with a sentiment label and reports a
//! per-user mood trend.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

// Re-export commonly used types
pub use config::Config;
pub use db::{EntryStore, PgEntryStore};
pub use error::{ClassifierError, JournalError, Result};
pub use models::{EntryRequest, JournalEntry, MoodSummary, NewEntry, SentimentLabel};
pub use services::{KeywordHeuristic, MoodAggregator, SentimentClassifier};

/// Shared state of the HTTP handlers
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
    pub classifier: Arc<SentimentClassifier>,
    pub aggregator: MoodAggregator,
    pub inference_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EntryStore>,
        classifier: Arc<SentimentClassifier>,
        aggregator: MoodAggregator,
    ) -> Self {
        Self {
            store,
            classifier,
            aggregator,
            inference_timeout: None,
        }
    }

    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }
}
