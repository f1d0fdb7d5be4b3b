/// Entry handlers - HTTP endpoints for journal entries and mood statistics
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::{JournalError, Result};
use crate::identity::OwnerId;
use crate::models::{EntryRequest, NewEntry};
use crate::services::classify_off_thread;
use crate::AppState;

/// Create an entry, tagging its content with a sentiment label
pub async fn create_entry(
    state: web::Data<AppState>,
    owner: OwnerId,
    payload: web::Json<EntryRequest>,
) -> Result<HttpResponse> {
    let new_entry = classified_entry(&state, payload.into_inner()).await?;
    let entry = state.store.create_entry(owner.0, new_entry).await?;

    Ok(HttpResponse::Created().json(entry))
}

/// List the caller's entries, newest first
pub async fn list_entries(state: web::Data<AppState>, owner: OwnerId) -> Result<HttpResponse> {
    let entries = state.store.list_entries(owner.0).await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn get_entry(
    state: web::Data<AppState>,
    owner: OwnerId,
    entry_id: web::Path<String>,
) -> Result<HttpResponse> {
    let entry_id = parse_entry_id(&entry_id)?;
    let entry = state.store.get_entry(owner.0, entry_id).await?;

    Ok(HttpResponse::Ok().json(entry))
}

/// Replace an entry's title and content; the sentiment is re-derived from the new content
pub async fn update_entry(
    state: web::Data<AppState>,
    owner: OwnerId,
    entry_id: web::Path<String>,
    payload: web::Json<EntryRequest>,
) -> Result<HttpResponse> {
    let entry_id = parse_entry_id(&entry_id)?;
    let new_entry = classified_entry(&state, payload.into_inner()).await?;
    let entry = state.store.update_entry(owner.0, entry_id, new_entry).await?;

    Ok(HttpResponse::Ok().json(entry))
}

pub async fn delete_entry(
    state: web::Data<AppState>,
    owner: OwnerId,
    entry_id: web::Path<String>,
) -> Result<HttpResponse> {
    let entry_id = parse_entry_id(&entry_id)?;
    state.store.delete_entry(owner.0, entry_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Mood trend over all of the caller's entries
pub async fn mood_summary(state: web::Data<AppState>, owner: OwnerId) -> Result<HttpResponse> {
    let labels = state.store.list_sentiments(owner.0).await?;
    let summary = state.aggregator.summarize(labels);

    tracing::debug!(
        owner_id = %owner.0,
        total = summary.total,
        average_sentiment = %summary.average_sentiment,
        "Mood summary computed"
    );

    Ok(HttpResponse::Ok().json(summary))
}

async fn classified_entry(state: &AppState, request: EntryRequest) -> Result<NewEntry> {
    request.validate()?;

    let classification = classify_off_thread(
        state.classifier.clone(),
        request.content.clone(),
        state.inference_timeout,
    )
    .await;

    tracing::debug!(
        sentiment = %classification.label,
        source = classification.source.as_str(),
        "Entry content classified"
    );

    Ok(NewEntry {
        title: request.title,
        content: request.content,
        sentiment: classification.label,
    })
}

fn parse_entry_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| JournalError::BadRequest("Invalid entry ID".to_string()))
}
