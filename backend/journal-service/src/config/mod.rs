use crate::error::{JournalError, Result};
use crate::services::{
    MoodAggregator, SentimentWeights, TrendThresholds, DEFAULT_MAX_INFLIGHT,
};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    // Server configuration
    pub http_host: String,
    pub http_port: u16,
    pub cors_allowed_origin: String,

    // Database configuration
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Sentiment model
    pub sentiment_model_dir: Option<String>,
    pub inference_timeout: Option<Duration>,
    pub max_inflight_inferences: usize,

    // Mood aggregation
    pub mood_weights: SentimentWeights,
    pub mood_thresholds: TrendThresholds,

    // Service configuration
    pub service_name: String,
    pub environment: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("http_host", &self.http_host)
            .field("http_port", &self.http_port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("sentiment_model_dir", &self.sentiment_model_dir)
            .field("inference_timeout", &self.inference_timeout)
            .field("max_inflight_inferences", &self.max_inflight_inferences)
            .field("mood_weights", &self.mood_weights)
            .field("mood_thresholds", &self.mood_thresholds)
            .field("service_name", &self.service_name)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = SentimentWeights::default();
        let mood_weights = SentimentWeights {
            positive: parse_var("MOOD_WEIGHT_POSITIVE", defaults.positive)?,
            neutral: parse_var("MOOD_WEIGHT_NEUTRAL", defaults.neutral)?,
            negative: parse_var("MOOD_WEIGHT_NEGATIVE", defaults.negative)?,
        };

        let defaults = TrendThresholds::default();
        let mood_thresholds = TrendThresholds {
            positive: parse_var("MOOD_POSITIVE_THRESHOLD", defaults.positive)?,
            neutral: parse_var("MOOD_NEUTRAL_THRESHOLD", defaults.neutral)?,
        };
        validate_mood_settings(&mood_weights, &mood_thresholds)?;

        let inference_timeout = optional_var("SENTIMENT_INFERENCE_TIMEOUT_MS")
            .map(|raw| parse_value::<u64>("SENTIMENT_INFERENCE_TIMEOUT_MS", &raw))
            .transpose()?
            .map(Duration::from_millis);

        let max_inflight_inferences =
            parse_var("SENTIMENT_MAX_INFLIGHT", DEFAULT_MAX_INFLIGHT)?;
        if max_inflight_inferences == 0 {
            return Err(JournalError::Config(
                "SENTIMENT_MAX_INFLIGHT must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_var("HTTP_PORT", 8000)?,
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| JournalError::Config("DATABASE_URL must be set".to_string()))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", 10)?,
            sentiment_model_dir: optional_var("SENTIMENT_MODEL_DIR"),
            inference_timeout,
            max_inflight_inferences,
            mood_weights,
            mood_thresholds,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "journal-service".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    pub fn mood_aggregator(&self) -> MoodAggregator {
        MoodAggregator::new(self.mood_weights, self.mood_thresholds)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Weights must be finite and non-negative; thresholds finite and ordered
fn validate_mood_settings(
    weights: &SentimentWeights,
    thresholds: &TrendThresholds,
) -> Result<()> {
    let weights = [
        ("MOOD_WEIGHT_POSITIVE", weights.positive),
        ("MOOD_WEIGHT_NEUTRAL", weights.neutral),
        ("MOOD_WEIGHT_NEGATIVE", weights.negative),
    ];
    for (name, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(JournalError::Config(format!(
                "{} must be a finite non-negative number, got {}",
                name, weight
            )));
        }
    }

    let bounds = [
        ("MOOD_POSITIVE_THRESHOLD", thresholds.positive),
        ("MOOD_NEUTRAL_THRESHOLD", thresholds.neutral),
    ];
    for (name, bound) in bounds {
        if !bound.is_finite() {
            return Err(JournalError::Config(format!(
                "{} must be a finite number, got {}",
                name, bound
            )));
        }
    }

    if thresholds.neutral > thresholds.positive {
        return Err(JournalError::Config(format!(
            "MOOD_NEUTRAL_THRESHOLD ({}) must not exceed MOOD_POSITIVE_THRESHOLD ({})",
            thresholds.neutral, thresholds.positive
        )));
    }

    Ok(())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match optional_var(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| JournalError::Config(format!("{} has invalid value '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "HTTP_PORT",
        "SENTIMENT_MODEL_DIR",
        "SENTIMENT_INFERENCE_TIMEOUT_MS",
        "SENTIMENT_MAX_INFLIGHT",
        "MOOD_WEIGHT_POSITIVE",
        "MOOD_WEIGHT_NEUTRAL",
        "MOOD_WEIGHT_NEGATIVE",
        "MOOD_POSITIVE_THRESHOLD",
        "MOOD_NEUTRAL_THRESHOLD",
    ];

    fn reset() {
        for var in VARS {
            env::remove_var(var);
        }
        env::set_var("DATABASE_URL", "postgres://test");
    }

    #[test]
    #[serial]
    fn test_default_config() {
        reset();
        let config = Config::from_env().unwrap();
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.mood_weights, SentimentWeights::default());
        assert_eq!(config.mood_thresholds.positive, 1.5);
        assert_eq!(config.mood_thresholds.neutral, 0.5);
        assert!(config.sentiment_model_dir.is_none());
        assert!(config.inference_timeout.is_none());
        assert_eq!(config.max_inflight_inferences, DEFAULT_MAX_INFLIGHT);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        reset();
        env::set_var("SENTIMENT_MODEL_DIR", "/models/sentiment");
        env::set_var("SENTIMENT_INFERENCE_TIMEOUT_MS", "250");
        env::set_var("MOOD_POSITIVE_THRESHOLD", "1.75");

        let config = Config::from_env().unwrap();
        assert_eq!(config.sentiment_model_dir.as_deref(), Some("/models/sentiment"));
        assert_eq!(config.inference_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.mood_thresholds.positive, 1.75);
        reset();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_error() {
        reset();
        env::set_var("HTTP_PORT", "eighty");
        assert!(matches!(Config::from_env(), Err(JournalError::Config(_))));
        reset();
    }

    #[test]
    #[serial]
    fn test_inverted_thresholds_rejected() {
        reset();
        env::set_var("MOOD_POSITIVE_THRESHOLD", "0.4");
        assert!(Config::from_env().is_err());
        reset();
    }

    #[test]
    #[serial]
    fn test_non_finite_thresholds_rejected() {
        for (var, value) in [
            ("MOOD_POSITIVE_THRESHOLD", "NaN"),
            ("MOOD_NEUTRAL_THRESHOLD", "nan"),
            ("MOOD_POSITIVE_THRESHOLD", "inf"),
            ("MOOD_NEUTRAL_THRESHOLD", "-inf"),
        ] {
            reset();
            env::set_var(var, value);
            assert!(
                matches!(Config::from_env(), Err(JournalError::Config(_))),
                "{}={} should be rejected",
                var,
                value
            );
        }
        reset();
    }

    #[test]
    #[serial]
    fn test_invalid_weights_rejected() {
        for (var, value) in [
            ("MOOD_WEIGHT_POSITIVE", "NaN"),
            ("MOOD_WEIGHT_NEUTRAL", "inf"),
            ("MOOD_WEIGHT_NEGATIVE", "-1"),
        ] {
            reset();
            env::set_var(var, value);
            assert!(
                matches!(Config::from_env(), Err(JournalError::Config(_))),
                "{}={} should be rejected",
                var,
                value
            );
        }
        reset();
    }

    #[test]
    #[serial]
    fn test_zero_max_inflight_rejected() {
        reset();
        env::set_var("SENTIMENT_MAX_INFLIGHT", "0");
        assert!(matches!(Config::from_env(), Err(JournalError::Config(_))));
        reset();
    }

    #[test]
    #[serial]
    fn test_zero_weight_accepted() {
        reset();
        env::set_var("MOOD_WEIGHT_NEUTRAL", "0");
        let config = Config::from_env().unwrap();
        assert_eq!(config.mood_weights.neutral, 0.0);
        reset();
    }

    #[test]
    #[serial]
    fn test_debug_redacts_database_url() {
        reset();
        env::set_var("DATABASE_URL", "postgres://user:secret@db/journal");
        let config = Config::from_env().unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
        reset();
    }
}
