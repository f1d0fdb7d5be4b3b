/// HTTP handlers for the journal API
pub mod entries;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::metrics::metrics_handler;
use crate::AppState;

pub use entries::{
    create_entry, delete_entry, get_entry, list_entries, mood_summary, update_entry,
};

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Wellbeing Journal API" }))
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let model = if state.classifier.is_model_loaded() {
        "loaded"
    } else {
        "not_loaded"
    };

    HttpResponse::Ok().json(json!({ "status": "healthy", "sentiment_model": model }))
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics_handler))
        .service(
            web::scope("/api/entries")
                .route("", web::post().to(create_entry))
                .route("", web::get().to(list_entries))
                .route("/stats/summary", web::get().to(mood_summary))
                .route("/{entry_id}", web::get().to(get_entry))
                .route("/{entry_id}", web::put().to(update_entry))
                .route("/{entry_id}", web::delete().to(delete_entry)),
        );
}
