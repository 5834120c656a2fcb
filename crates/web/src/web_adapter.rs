use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use mood_tracker_core::{
    application::service::DEFAULT_RECENT_LIMIT,
    domain::mood_entry::MoodSubmission,
    ports::application_service::{ApplicationService, ApplicationServiceError},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{instrument, warn};

use crate::error::{WebError, WebResult};

pub const MAX_LIST_LIMIT: usize = 1000;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ApplicationService>,
}

pub fn router(service: Arc<dyn ApplicationService>) -> Router {
    Router::new()
        .route("/api/mood", post(submit_mood))
        .route("/api/moods", get(list_moods))
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

#[derive(Deserialize, Debug, Default)]
pub struct MoodQuery {
    pub limit: Option<usize>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tag: Option<String>,
}

#[instrument(skip_all)]
pub async fn submit_mood(
    State(state): State<AppState>,
    body: Result<Json<MoodSubmission>, JsonRejection>,
) -> WebResult<Json<Value>> {
    let Json(submission) = body.map_err(|e| WebError::Validation(e.body_text()))?;

    let entry = state.service.log_mood(submission).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Mood logged successfully",
        "data": entry,
    })))
}

#[instrument(skip_all)]
pub async fn list_moods(
    State(state): State<AppState>,
    query: Result<Query<MoodQuery>, QueryRejection>,
) -> WebResult<Json<Value>> {
    let Query(query) = query.map_err(|e| WebError::Validation(e.body_text()))?;

    let tag = query.tag.as_deref().map(str::trim).filter(|tag| !tag.is_empty());

    let entries = match (tag, query.start, query.end) {
        (Some(tag), _, _) => state.service.entries_with_tag(tag).await?,
        (None, Some(start), Some(end)) => state.service.entries_between(start, end).await?,
        _ => {
            let limit = query
                .limit
                .unwrap_or(DEFAULT_RECENT_LIMIT)
                .min(MAX_LIST_LIMIT);
            state.service.recent_entries(limit).await?
        }
    };

    Ok(Json(json!({
        "status": "success",
        "data": entries,
    })))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "mood-tracker",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.service.health_check().await {
        Ok(info) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "spreadsheet": "ok" },
                "spreadsheet": info,
            })),
        ),
        Err(report) => {
            warn!(error = ?report, "Readiness check failed");
            let reason = match report.current_context() {
                ApplicationServiceError::Storage(kind) => kind.to_string(),
                other => other.to_string(),
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "checks": { "spreadsheet": reason },
                })),
            )
        }
    }
}
