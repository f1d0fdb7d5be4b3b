//! Prometheus metrics for classification and HTTP traffic

use crate::services::LabelSource;
use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, TextEncoder};
use std::time::Duration;

static CLASSIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "journal_sentiment_classifications_total",
            "Sentiment classifications by producing path",
        ),
        &["source"],
    )
    .expect("failed to create journal_sentiment_classifications_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register journal_sentiment_classifications_total");
    counter
});

static CLASSIFICATION_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "journal_sentiment_classification_duration_seconds",
            "Sentiment classification latency by producing path",
        )
        .buckets(vec![
            0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["source"],
    )
    .expect("failed to create journal_sentiment_classification_duration_seconds");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("failed to register journal_sentiment_classification_duration_seconds");
    histogram
});

static MODEL_LOAD_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "journal_sentiment_model_load_failures_total",
        "Failed attempts to construct the sentiment model",
    )
    .expect("failed to create journal_sentiment_model_load_failures_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register journal_sentiment_model_load_failures_total");
    counter
});

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "journal_http_requests_total",
            "Total HTTP requests handled by journal-service",
        ),
        &["method", "path", "status"],
    )
    .expect("failed to create journal_http_requests_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register journal_http_requests_total");
    counter
});

pub fn record_classification(source: LabelSource, elapsed: Duration) {
    CLASSIFICATIONS_TOTAL
        .with_label_values(&[source.as_str()])
        .inc();
    CLASSIFICATION_DURATION_SECONDS
        .with_label_values(&[source.as_str()])
        .observe(elapsed.as_secs_f64());
}

/// Classification samples recorded so far, across sources
#[cfg(test)]
pub(crate) fn classifications_recorded() -> u64 {
    [LabelSource::Model, LabelSource::Fallback]
        .iter()
        .map(|source| CLASSIFICATIONS_TOTAL.with_label_values(&[source.as_str()]).get())
        .sum()
}

pub fn record_model_load_failure() {
    MODEL_LOAD_FAILURES_TOTAL.inc();
}

pub fn record_http_request(method: &str, path: &str, status: u16) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
}

pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(classification_metrics)]
    fn test_classification_counter_increments() {
        let before = CLASSIFICATIONS_TOTAL
            .with_label_values(&[LabelSource::Fallback.as_str()])
            .get();
        record_classification(LabelSource::Fallback, Duration::from_millis(1));
        let after = CLASSIFICATIONS_TOTAL
            .with_label_values(&[LabelSource::Fallback.as_str()])
            .get();
        assert_eq!(after, before + 1);
    }
}
