use actix_cors::Cors;
use actix_web::{dev::Service, http::header, web, App, HttpServer};
use journal_service::{
    config::Config,
    db::{self, PgEntryStore},
    handlers, metrics,
    services::{onnx_model::DEFAULT_MODEL_ID, KeywordHeuristic, SentimentClassifier},
    AppState,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        http_port = %config.http_port,
        "Configuration loaded"
    );

    // Initialize database pool
    let pool = Arc::new(
        db::create_pool(
            &config.database_url,
            config.db_max_connections,
            config.db_acquire_timeout_secs,
        )
        .await?,
    );
    tracing::info!("Database pool initialized");

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await.map_err(|e| {
        tracing::error!("Migration failed: {}", e);
        e
    })?;
    tracing::info!("Migrations completed successfully");

    // The model itself is loaded on the first classification
    let classifier = match &config.sentiment_model_dir {
        Some(dir) => {
            tracing::info!(
                model_dir = %dir,
                expected_model = DEFAULT_MODEL_ID,
                "Sentiment model configured"
            );
            SentimentClassifier::from_model_dir(dir, KeywordHeuristic::default())
        }
        None => {
            tracing::warn!(
                "SENTIMENT_MODEL_DIR not set; entries are tagged by the keyword heuristic"
            );
            SentimentClassifier::heuristic_only(KeywordHeuristic::default())
        }
    };

    let classifier = classifier.with_max_inflight(config.max_inflight_inferences);

    let state = web::Data::new(
        AppState::new(
            Arc::new(PgEntryStore::new(pool.clone())),
            Arc::new(classifier),
            config.mood_aggregator(),
        )
        .with_inference_timeout(config.inference_timeout),
    );

    let bind_address = format!("{}:{}", config.http_host, config.http_port);
    let cors_origin = config.cors_allowed_origin.clone();

    tracing::info!("Starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allow_any_method()
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allowed_header("x-user-id")
            .supports_credentials();

        App::new()
            .app_data(state.clone())
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let fut = srv.call(req);
                async move {
                    let res = fut.await?;
                    let path = res
                        .request()
                        .match_pattern()
                        .unwrap_or_else(|| "unmatched".to_string());
                    metrics::record_http_request(&method, &path, res.status().as_u16());
                    Ok(res)
                }
            })
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    tracing::info!("Journal service shutting down");
    Ok(())
}
